use super::*;

#[command_handler("TOPIC", 2)]
fn handle_topic(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let network = ctx.network_index();
    let channel = ctx.channel(&message.args[0])?;
    let text = message.args[1].clone();

    ctx.apply(SetTopic {
        network,
        channel,
        topic: (!text.is_empty()).then(|| text.clone()),
    })?;

    let activity = state::Activity::new(
        ctx.ts(),
        state::ActivityKind::Topic {
            by: source_name(message),
            text,
        },
    );
    ctx.apply(ChannelActivity {
        network,
        channel,
        activity,
    })?;
    Ok(())
}

/// The topic as reported on join
#[command_handler("332", 3)]
fn handle_topic_reply(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    let channel = ctx.channel(&message.args[1])?;

    ctx.apply(SetTopic {
        network: ctx.network_index(),
        channel,
        topic: Some(message.args[2].clone()),
    })?;
    Ok(())
}
