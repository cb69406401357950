pub const CMD_URL: &str = "url";
pub const CMD_QUESTION: &str = "question";
pub const CMD_SUMMARIZE: &str = "summarize";
pub const CMD_ASK: &str = "ask";
pub const CMD_SHOW: &str = "show";
pub const CMD_QUIT: &str = "quit";

pub const POPUP_HELP: &str = "\
commands:
  url <text>        set the URL field
  question <text>   set the question field
  summarize         summarize the URL
  ask               ask the question about the URL
  show              print the popup
  quit              close the popup";
