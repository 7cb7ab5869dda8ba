use super::*;
use skein_network::protocol::outbound;

/// Registration is confirmed; note the nick we were given, and join the
/// configured channels in order
#[command_handler("001", 1)]
fn handle_welcome(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let network = ctx.network_index();
    let nick = Nickname::from_str(&message.args[0])?;

    ctx.apply(SetNickname { network, nick })?;
    ctx.apply(SetConnectionState {
        network,
        state: state::ConnectionState::Registered,
    })?;

    tracing::info!(network, "Registered");

    let channels = ctx.network()?.settings.channels.clone();
    for channel in channels {
        ctx.send(outbound::join(channel.as_str()));
    }
    Ok(())
}

/// Picks the mode argument rules out of the server's feature advertisement
#[command_handler("005", 2)]
fn handle_isupport(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    // First argument is our nick, last is the human-readable trailer
    let tokens = &message.args[1..message.args.len() - 1];

    for token in tokens {
        match token.split_once('=') {
            Some(("CHANMODES", value)) => ctx.modes_mut().apply_chanmodes(value),
            Some(("PREFIX", value)) => ctx.modes_mut().apply_prefix(value),
            _ => (),
        }
    }
    Ok(())
}

#[command_handler("ERROR")]
fn handle_error(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let text = message.arg(0).unwrap_or_default().to_string();
    tracing::warn!(network = ctx.network_index(), "Network sent ERROR: {}", text);

    let activity = state::Activity::new(ctx.ts(), state::ActivityKind::Status { text });
    ctx.apply(NetworkActivity {
        network: ctx.network_index(),
        activity,
    })?;
    Ok(())
}
