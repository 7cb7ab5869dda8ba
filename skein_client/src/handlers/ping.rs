use super::*;
use skein_network::protocol::outbound;

#[command_handler("PING", 1)]
fn handle_ping(ctx: &mut HandlerContext, message: &Message) -> HandleResult
{
    ctx.send(outbound::pong(&message.args[0]));
    Ok(())
}
