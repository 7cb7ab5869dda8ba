use super::*;

#[command_handler("PART", 1)]
fn handle_part(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let source = source_nick(message)?;
    let network = ctx.network_index();
    let channel = ctx.channel(&message.args[0])?;

    if ctx.is_own_nick(source)? {
        tracing::info!(network, channel = %message.args[0], "Left");
        ctx.apply(RemoveChannel { network, channel })?;
    } else {
        let ts = ctx.ts();
        ctx.apply(Part {
            network,
            channel,
            nick: Nickname::from_str(source)?,
            reason: message.arg(1).map(str::to_owned),
            ts,
        })?;
    }
    Ok(())
}

#[command_handler("KICK", 2)]
fn handle_kick(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let network = ctx.network_index();
    let channel_name = &message.args[0];
    let channel = ctx.channel(channel_name)?;
    let nick = Nickname::from_str(&message.args[1])?;
    let by = source_name(message);
    let reason = message.arg(2).map(str::to_owned);
    let ts = ctx.ts();

    if ctx.is_own_nick(nick.as_str())? {
        tracing::info!(network, channel = %channel_name, %by, "Kicked");
        ctx.apply(RemoveChannel { network, channel })?;

        let text = match &reason {
            Some(reason) => format!("Kicked from {} by {} ({})", channel_name, by, reason),
            None => format!("Kicked from {} by {}", channel_name, by),
        };
        let activity = state::Activity::new(ts, state::ActivityKind::Status { text });
        ctx.apply(NetworkActivity { network, activity })?;
    } else {
        ctx.apply(Kick {
            network,
            channel,
            nick,
            by,
            reason,
            ts,
        })?;
    }
    Ok(())
}
