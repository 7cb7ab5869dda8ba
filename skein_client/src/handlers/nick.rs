use super::*;

#[command_handler("NICK", 1)]
fn handle_nick(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let network = ctx.network_index();
    let old = Nickname::from_str(source_nick(message)?)?;
    let new = Nickname::from_str(&message.args[0])?;
    let ts = ctx.ts();

    if ctx.is_own_nick(old.as_str())? {
        ctx.apply(SetNickname {
            network,
            nick: new.clone(),
        })?;
    }
    ctx.apply(RenameMember { network, old, new, ts })?;
    Ok(())
}

#[command_handler("QUIT")]
fn handle_quit(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let nick = Nickname::from_str(source_nick(message)?)?;
    let ts = ctx.ts();

    ctx.apply(MemberQuit {
        network: ctx.network_index(),
        nick,
        reason: message.arg(0).map(str::to_owned),
        ts,
    })?;
    Ok(())
}
