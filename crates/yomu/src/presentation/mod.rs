pub mod detail;
pub mod library;
pub mod login;
pub mod reader;
pub mod shell;
pub mod startup;

/// Screen to show next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Startup,
    Login,
    Library,
    Detail,
    Reader,
    Quit,
}
