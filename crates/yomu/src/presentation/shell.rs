use std::{str::SplitWhitespace, sync::Arc};

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::{
    context::Context,
    domain::repositories::store::KeyValueStore,
    presentation::{
        Route, detail::DetailScreen, library::LibraryScreen, login::LoginScreen,
        reader::ReaderScreen, startup,
    },
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Login { username: String, password: String },
    Refresh,
    Open(usize),
    Download(usize),
    Redownload(usize),
    Delete(usize),
    Next,
    Prev,
    Page(usize),
    Back,
    Logout,
    Quit,
    Help,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let name = words.next().unwrap_or_default();

        let command = match name {
            "login" => {
                let username = words.next().unwrap_or_default().to_string();
                let password = words.collect::<Vec<_>>().join(" ");
                Command::Login { username, password }
            }
            "refresh" => Command::Refresh,
            "open" => Command::Open(number(name, &mut words)?),
            "download" => Command::Download(number(name, &mut words)?),
            "redownload" => Command::Redownload(number(name, &mut words)?),
            "delete" => Command::Delete(number(name, &mut words)?),
            "page" => Command::Page(number(name, &mut words)?),
            "next" | "n" => Command::Next,
            "prev" | "p" => Command::Prev,
            "back" => Command::Back,
            "logout" => Command::Logout,
            "quit" | "exit" => Command::Quit,
            "help" | "" => Command::Help,
            other => return Err(format!("unknown command {other:?}")),
        };

        Ok(command)
    }
}

fn number(name: &str, words: &mut SplitWhitespace<'_>) -> Result<usize, String> {
    let arg = words
        .next()
        .ok_or_else(|| format!("{name} needs a number"))?;

    arg.parse()
        .map_err(|_| format!("{arg:?} is not a number"))
}

const HELP: &str = "commands: login <user> <password>, refresh, open N, download N, \
redownload N, delete N, next, prev, page N, back, logout, quit";

/// Line oriented terminal driver. Each screen renders as text and every
/// input line is one command for the screen on display.
pub struct Shell<S>
where
    S: KeyValueStore + Clone,
{
    ctx: Arc<Context<S>>,
    route: Route,
    login: LoginScreen<S>,
    library: LibraryScreen<S>,
    detail: DetailScreen<S>,
    reader: ReaderScreen<S>,
    message: Option<String>,
}

impl<S> Shell<S>
where
    S: KeyValueStore + Clone,
{
    pub fn new(ctx: Arc<Context<S>>) -> Self {
        Self {
            login: LoginScreen::new(ctx.clone()),
            library: LibraryScreen::new(ctx.clone()),
            detail: DetailScreen::new(ctx.clone()),
            reader: ReaderScreen::new(ctx.clone()),
            ctx,
            route: Route::Startup,
            message: None,
        }
    }

    pub fn route(&self) -> Route {
        self.route
    }

    /// Shows `route`, loading whatever the screen needs first
    pub async fn navigate(&mut self, route: Route) {
        let mut route = route;
        loop {
            let next = match route {
                Route::Startup => match startup::validate(&self.ctx).await {
                    Ok(next) => next,
                    Err(e) => {
                        error!("startup failed: {e}");
                        Route::Login
                    }
                },
                Route::Login => {
                    self.login.prefill().await;
                    Route::Login
                }
                Route::Library => self.library.load().await,
                Route::Detail => self.detail.load().await.unwrap_or_else(|e| {
                    self.message = Some(e.to_string());
                    Route::Library
                }),
                Route::Reader => self.reader.open().await,
                Route::Quit => Route::Quit,
            };

            if next == route {
                break;
            }
            route = next;
        }

        self.route = route;
    }

    pub async fn handle(&mut self, command: Command) {
        self.message = None;

        let next = match (self.route, command) {
            (_, Command::Quit) => Some(Route::Quit),
            (_, Command::Help) => {
                self.message = Some(HELP.to_string());
                None
            }
            (_, Command::Logout) => {
                if let Err(e) = self.ctx.session.logout(false).await {
                    self.message = Some(e.to_string());
                }
                Some(Route::Login)
            }
            (Route::Login, Command::Login { username, password }) => {
                let next = self.login.submit(&username, &password).await;
                (next != Route::Login).then_some(next)
            }
            (Route::Library, Command::Refresh) => Some(self.library.refresh().await),
            (Route::Library, Command::Open(index)) => match self.library.select(index).await {
                Ok(next) => Some(next),
                Err(e) => {
                    self.message = Some(e.to_string());
                    None
                }
            },
            (Route::Detail, Command::Refresh) => Some(Route::Detail),
            (Route::Detail, Command::Open(index)) => {
                let res = self.detail.open(index).await;
                self.report(res)
            }
            (Route::Detail, Command::Download(index)) => {
                let res = self.detail.download(index).await;
                self.report(res.map(|_| Route::Detail));
                None
            }
            (Route::Detail, Command::Redownload(index)) => {
                let res = self.detail.redownload(index).await;
                self.report(res.map(|_| Route::Detail));
                None
            }
            (Route::Detail, Command::Delete(index)) => {
                let res = self.detail.remove(index).await;
                self.report(res.map(|_| Route::Detail));
                None
            }
            (Route::Detail, Command::Back) => Some(Route::Library),
            (Route::Reader, Command::Next) => {
                let res = self.reader.next().await;
                self.report(res.map(|_| Route::Reader));
                None
            }
            (Route::Reader, Command::Prev) => {
                let res = self.reader.prev().await;
                self.report(res.map(|_| Route::Reader));
                None
            }
            (Route::Reader, Command::Page(page)) => {
                let res = self.reader.goto(page).await;
                self.report(res.map(|_| Route::Reader));
                None
            }
            (Route::Reader, Command::Back) => Some(Route::Detail),
            (route, _) => {
                self.message = Some(format!("command not available on {route:?}"));
                None
            }
        };

        if let Some(next) = next {
            self.navigate(next).await;
        }
    }

    fn report<E: std::fmt::Display>(&mut self, res: Result<Route, E>) -> Option<Route> {
        match res {
            Ok(route) => Some(route),
            Err(e) => {
                self.message = Some(e.to_string());
                None
            }
        }
    }

    pub fn render(&self) -> String {
        let mut out = match self.route {
            Route::Startup => String::from("starting...\n"),
            Route::Login => self.login.render(),
            Route::Library => self.library.render(),
            Route::Detail => self.detail.render(),
            Route::Reader => self.reader.render(),
            Route::Quit => String::new(),
        };
        if let Some(message) = &self.message {
            out.push_str(message);
            out.push('\n');
        }
        out
    }

    pub async fn run<R, W>(&mut self, input: R, mut output: W) -> Result<(), anyhow::Error>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        self.navigate(Route::Startup).await;

        let mut lines = input.lines();
        loop {
            output.write_all(self.render().as_bytes()).await?;
            output.write_all(b"> ").await?;
            output.flush().await?;

            let Some(line) = lines.next_line().await? else {
                break;
            };

            match Command::parse(&line) {
                Ok(command) => self.handle(command).await,
                Err(e) => self.message = Some(e),
            }

            if self.route == Route::Quit {
                break;
            }
        }

        Ok(())
    }
}
