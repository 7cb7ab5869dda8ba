use super::*;
use skein_network::modes::{decode_modes, Polarity};

/// Channel mode changes. Privilege letters are folded into the affected
/// member's flags; the whole change is recorded as one activity entry.
#[command_handler("MODE", 2)]
fn handle_mode(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let target = &message.args[0];
    if !is_channel_name(target) {
        tracing::debug!(network = ctx.network_index(), %target, "Ignoring user mode change");
        return Ok(());
    }

    let network = ctx.network_index();
    let channel = ctx.channel(target)?;
    let changes = decode_modes(&message.args[1], &message.args[2..], ctx.modes())?;

    // Work out every member change before applying any of them
    let mut member_changes = Vec::new();
    for entry in &changes {
        let (Some(flag), Some(arg)) = (MemberFlag::from_mode_char(entry.flag), &entry.argument) else {
            continue;
        };
        let nick = match Nickname::from_str(arg) {
            Ok(nick) => nick,
            Err(e) => {
                tracing::warn!(network, channel = %target, "Mode change for invalid nick: {}", e);
                continue;
            }
        };
        if ctx.channel_state(channel)?.member(nick.as_str()).is_none() {
            tracing::warn!(network, channel = %target, %nick, "Mode change for unknown member");
            continue;
        }

        let (added, removed) = match entry.polarity {
            Polarity::Plus => (flag.into(), MemberFlagSet::new()),
            Polarity::Minus => (MemberFlagSet::new(), flag.into()),
        };
        member_changes.push(MemberModeChange {
            network,
            channel,
            nick,
            added,
            removed,
        });
    }

    for change in member_changes {
        ctx.apply(change)?;
    }

    let activity = state::Activity::new(
        ctx.ts(),
        state::ActivityKind::Mode {
            by: source_name(message),
            changes,
        },
    );
    ctx.apply(ChannelActivity {
        network,
        channel,
        activity,
    })?;
    Ok(())
}
