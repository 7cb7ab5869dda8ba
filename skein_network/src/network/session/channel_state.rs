use super::SessionState;
use crate::network::change::*;
use crate::prelude::*;

impl SessionState {
    pub(super) fn add_channel(&mut self, detail: &AddChannel) -> LookupResult<()> {
        let network = self.network_mut(detail.network)?;

        // A channel kept from before a reconnect is reused, history and all
        if network.channel_index(detail.name.as_str()).is_none() {
            network.channels.push(state::Channel::new(detail.name.clone()));
        }
        Ok(())
    }

    pub(super) fn remove_channel(&mut self, detail: &RemoveChannel) -> LookupResult<()> {
        self.channel(detail.network, detail.channel)?;
        self.network_mut(detail.network)?
            .channels
            .remove(detail.channel);
        Ok(())
    }

    pub(super) fn append_pending_members(&mut self, detail: &AppendPendingMembers) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;

        for member in &detail.members {
            match channel.pending_members.iter_mut().find(|m| m.nick == member.nick) {
                Some(existing) => *existing = member.clone(),
                None => channel.pending_members.push(member.clone()),
            }
        }
        Ok(())
    }

    pub(super) fn commit_member_list(&mut self, detail: &CommitMemberList) -> LookupResult<()> {
        let channel = self.channel_mut(detail.network, detail.channel)?;
        channel.members = std::mem::take(&mut channel.pending_members);
        Ok(())
    }

    pub(super) fn channel_activity(&mut self, detail: &ChannelActivity) -> LookupResult<()> {
        self.channel_mut(detail.network, detail.channel)?
            .activity
            .push(detail.activity.clone());
        Ok(())
    }

    pub(super) fn set_topic(&mut self, detail: &SetTopic) -> LookupResult<()> {
        self.channel_mut(detail.network, detail.channel)?.topic = detail.topic.clone();
        Ok(())
    }
}
