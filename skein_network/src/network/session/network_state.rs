use super::SessionState;
use crate::network::change::*;
use crate::prelude::*;

impl SessionState {
    pub(super) fn add_network(&mut self, detail: &AddNetwork) -> LookupResult<()> {
        self.networks
            .push(state::Network::new(detail.id, detail.settings.clone()));
        Ok(())
    }

    pub(super) fn remove_network(&mut self, detail: &RemoveNetwork) -> LookupResult<()> {
        self.network(detail.network)?;
        self.networks.remove(detail.network);
        Ok(())
    }

    pub(super) fn set_connection_state(&mut self, detail: &SetConnectionState) -> LookupResult<()> {
        let network = self.network_mut(detail.network)?;
        network.connection = detail.state;

        if detail.state == state::ConnectionState::Disconnected {
            // Channels stay for their history, but nobody is in them any more
            for channel in &mut network.channels {
                channel.members.clear();
                channel.pending_members.clear();
            }
        }
        Ok(())
    }

    pub(super) fn set_nickname(&mut self, detail: &SetNickname) -> LookupResult<()> {
        self.network_mut(detail.network)?.nick = detail.nick.clone();
        Ok(())
    }

    pub(super) fn network_activity(&mut self, detail: &NetworkActivity) -> LookupResult<()> {
        self.network_mut(detail.network)?
            .activity
            .push(detail.activity.clone());
        Ok(())
    }

    pub(super) fn rename_member(&mut self, detail: &RenameMember) -> LookupResult<()> {
        let network = self.network_mut(detail.network)?;

        for channel in &mut network.channels {
            // A nick belongs to one member only; whoever held `new` before is stale
            let stale = |m: &state::Member| m.nick == detail.new && m.nick != detail.old;
            channel.members.retain(|m| !stale(m));
            channel.pending_members.retain(|m| !stale(m));

            for pending in channel.pending_members.iter_mut().filter(|m| m.nick == detail.old) {
                pending.nick = detail.new.clone();
            }

            let Some(member) = channel.members.iter_mut().find(|m| m.nick == detail.old) else {
                continue;
            };
            member.nick = detail.new.clone();

            channel.activity.push(state::Activity::new(
                detail.ts,
                state::ActivityKind::NickChange {
                    old: detail.old.clone(),
                    new: detail.new.clone(),
                },
            ));
        }
        Ok(())
    }

    pub(super) fn member_quit(&mut self, detail: &MemberQuit) -> LookupResult<()> {
        let network = self.network_mut(detail.network)?;

        for channel in &mut network.channels {
            channel.pending_members.retain(|m| m.nick != detail.nick);

            let before = channel.members.len();
            channel.members.retain(|m| m.nick != detail.nick);
            if channel.members.len() == before {
                continue;
            }

            channel.activity.push(state::Activity::new(
                detail.ts,
                state::ActivityKind::Quit {
                    nick: detail.nick.clone(),
                    reason: detail.reason.clone(),
                },
            ));
        }
        Ok(())
    }
}
