use super::SessionState;
use crate::network::change::*;
use crate::prelude::*;

impl SessionState {
    pub(super) fn member_joined(&mut self, detail: &Join) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;

        match channel.members.iter_mut().find(|m| m.nick == detail.member.nick) {
            Some(existing) => *existing = detail.member.clone(),
            None => channel.members.push(detail.member.clone()),
        }

        channel.activity.push(state::Activity::new(
            detail.ts,
            state::ActivityKind::Join {
                nick: detail.member.nick.clone(),
            },
        ));
        Ok(())
    }

    pub(super) fn member_parted(&mut self, detail: &Part) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;

        channel.members.retain(|m| m.nick != detail.nick);
        channel.pending_members.retain(|m| m.nick != detail.nick);

        channel.activity.push(state::Activity::new(
            detail.ts,
            state::ActivityKind::Part {
                nick: detail.nick.clone(),
                reason: detail.reason.clone(),
            },
        ));
        Ok(())
    }

    pub(super) fn member_kicked(&mut self, detail: &Kick) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;

        channel.members.retain(|m| m.nick != detail.nick);
        channel.pending_members.retain(|m| m.nick != detail.nick);

        channel.activity.push(state::Activity::new(
            detail.ts,
            state::ActivityKind::Kick {
                nick: detail.nick.clone(),
                by: detail.by.clone(),
                reason: detail.reason.clone(),
            },
        ));
        Ok(())
    }

    pub(super) fn member_mode_change(&mut self, detail: &MemberModeChange) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;

        let member = channel
            .members
            .iter_mut()
            .find(|m| m.nick == detail.nick)
            .ok_or_else(|| LookupError::NoSuchMember(detail.nick.clone()))?;

        member.flags.apply_change(detail.added, detail.removed);
        Ok(())
    }
}
