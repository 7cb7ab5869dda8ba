use super::*;
use skein_network::protocol::ctcp;

#[command_handler("PRIVMSG", 2)]
fn handle_privmsg(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let target = &message.args[0];
    let text = &message.args[1];
    let from = source_name(message);

    if !is_channel_name(target) {
        // TODO: keep per-nick query state once there is a place to show it
        tracing::debug!(network = ctx.network_index(), %from, "Direct message not tracked");
        return Ok(());
    }

    let channel = ctx.channel(target)?;
    let kind = match ctcp::parse(text) {
        Some(request) if request.command == "ACTION" => state::ActivityKind::Action {
            from,
            text: request.params.to_string(),
        },
        Some(request) => {
            tracing::debug!(command = request.command, %from, "Ignoring CTCP request");
            return Ok(());
        }
        None => state::ActivityKind::Chat {
            from,
            text: text.clone(),
        },
    };

    let activity = state::Activity::new(ctx.ts(), kind);
    ctx.apply(ChannelActivity {
        network: ctx.network_index(),
        channel,
        activity,
    })?;
    Ok(())
}

/// Channel notices go to the channel; anything else, including server
/// notices during registration, to the network
#[command_handler("NOTICE", 2)]
fn handle_notice(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let network = ctx.network_index();
    let target = &message.args[0];
    let activity = state::Activity::new(
        ctx.ts(),
        state::ActivityKind::Notice {
            from: source_name(message),
            text: message.args[1].clone(),
        },
    );

    if is_channel_name(target) {
        let channel = ctx.channel(target)?;
        ctx.apply(ChannelActivity {
            network,
            channel,
            activity,
        })?;
    } else {
        ctx.apply(NetworkActivity { network, activity })?;
    }
    Ok(())
}
