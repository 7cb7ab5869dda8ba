use super::*;
use skein_network::protocol::names;

/// One chunk of a names exchange. The roster is the last argument and the
/// channel the one before it; older servers leave out the visibility symbol.
#[command_handler("353", 3)]
fn handle_names_reply(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let count = message.args.len();
    let channel = ctx.channel(&message.args[count - 2])?;

    let members = names::parse_roster(&message.args[count - 1])
        .into_iter()
        .filter_map(|entry| match Nickname::from_str(&entry.nick) {
            Ok(nick) => Some(state::Member::new(nick).with_flags(entry.flags)),
            Err(e) => {
                tracing::debug!("Dropping names entry: {}", e);
                None
            }
        })
        .collect();

    ctx.apply(AppendPendingMembers {
        network: ctx.network_index(),
        channel,
        members,
    })?;
    Ok(())
}

#[command_handler("366", 2)]
fn handle_end_of_names(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let channel = ctx.channel(&message.args[1])?;

    ctx.apply(CommitMemberList {
        network: ctx.network_index(),
        channel,
    })?;
    Ok(())
}
