//! Builders for the lines we send to a network. None of these include the
//! CR LF terminator; the connection adds it when writing.

pub fn nick(nick: &str) -> String {
    format!("NICK {}", nick)
}

pub fn user(username: &str, host: &str, realname: &str) -> String {
    format!("USER {0} {0} {1} :{2}", username, host, realname)
}

pub fn join(channel: &str) -> String {
    format!("JOIN {}", channel)
}

pub fn part(channel: &str) -> String {
    format!("PART {}", channel)
}

pub fn privmsg(target: &str, text: &str) -> String {
    format!("PRIVMSG {} :{}", target, text)
}

pub fn topic(channel: &str, text: &str) -> String {
    format!("TOPIC {} :{}", channel, text)
}

pub fn pong(token: &str) -> String {
    format!("PONG :{}", token)
}

pub fn quit(message: &str) -> String {
    format!("QUIT :{}", message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_forms() {
        assert_eq!(nick("me"), "NICK me");
        assert_eq!(user("me", "irc.example.net", "Real Name"), "USER me me irc.example.net :Real Name");
        assert_eq!(join("#a"), "JOIN #a");
        assert_eq!(part("#a"), "PART #a");
        assert_eq!(privmsg("#a", "hi there"), "PRIVMSG #a :hi there");
        assert_eq!(pong("abc123"), "PONG :abc123");
        assert_eq!(quit(""), "QUIT :");
    }
}
