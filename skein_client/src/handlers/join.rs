use super::*;

#[command_handler("JOIN", 1)]
fn handle_join(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let Some(Origin::Peer { nick, login, host }) = &message.origin else {
        return Err(HandlerError::NoSource);
    };
    let network = ctx.network_index();
    let channel_name = &message.args[0];

    if ctx.is_own_nick(nick)? {
        let name = ChannelName::from_str(channel_name)?;
        tracing::info!(network, channel = %name, "Joined");
        ctx.apply(AddChannel { network, name })?;
    } else {
        let channel = ctx.channel(channel_name)?;
        let member = state::Member::new(Nickname::from_str(nick)?).with_identity(login, host);
        let ts = ctx.ts();
        ctx.apply(Join {
            network,
            channel,
            member,
            ts,
        })?;
    }
    Ok(())
}
