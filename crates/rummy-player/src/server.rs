use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, VecDeque};

use rummy_bot::controller::TurnController;
use rummy_bot::search::SearchConfig;
use rummy_core::game::serialization::SessionSnapshot;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tiny_http::{Header, Method, Response, Server, StatusCode};
use tracing::{Level, event};

const FALLBACK_GAME: &str = "default";
/// Sessions kept at once; the least recently started is dropped first.
pub const MAX_SESSIONS: usize = 32;

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

#[derive(Debug, Deserialize)]
struct GameInfo {
    game_id: String,
    #[serde(default)]
    opponent: String,
    hand: String,
}

#[derive(Debug, Deserialize)]
struct HandInfo {
    hand: String,
    #[serde(default)]
    game_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UpdateInfo {
    #[serde(default)]
    game_id: Option<String>,
    #[serde(default)]
    event: String,
}

#[derive(Debug, Serialize)]
struct StatusReply {
    status: &'static str,
}

#[derive(Debug, Serialize)]
struct PlayReply {
    play: String,
}

#[derive(Debug, Serialize)]
struct ErrorReply {
    error: String,
}

#[derive(Debug, Serialize)]
struct SessionsReply {
    status: &'static str,
    player: String,
    games: Vec<SessionSnapshot>,
}

/// An HTTP status with a JSON body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: u16,
    pub body: String,
}

impl Reply {
    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_string(value) {
            Ok(body) => Self { status, body },
            Err(err) => Self {
                status: 500,
                body: format!("{{\"error\":\"{err}\"}}"),
            },
        }
    }

    fn ok() -> Self {
        Self::json(200, &StatusReply { status: "OK" })
    }

    fn play(play: impl Into<String>) -> Self {
        Self::json(200, &PlayReply { play: play.into() })
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self::json(
            status,
            &ErrorReply {
                error: message.into(),
            },
        )
    }

    fn into_response(self) -> Response<std::io::Cursor<Vec<u8>>> {
        let response = Response::from_string(self.body).with_status_code(StatusCode(self.status));
        match Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
            Ok(header) => response.with_header(header),
            Err(()) => response,
        }
    }
}

/// Routes game-server requests to one [`TurnController`] per game.
///
/// Calls are handled one at a time, so each session sees its events in order.
/// At most [`MAX_SESSIONS`] games are kept.
pub struct PlayerService {
    player: String,
    search: SearchConfig,
    seed: u64,
    games: BTreeMap<String, TurnController>,
    /// Game ids in the order their sessions were created.
    order: VecDeque<String>,
    latest: Option<String>,
    games_started: u64,
    shutdown: bool,
}

impl PlayerService {
    pub fn new(player: impl Into<String>, search: SearchConfig, seed: u64) -> Self {
        Self {
            player: player.into(),
            search,
            seed,
            games: BTreeMap::new(),
            order: VecDeque::new(),
            latest: None,
            games_started: 0,
            shutdown: false,
        }
    }

    pub fn shutdown_requested(&self) -> bool {
        self.shutdown
    }

    pub fn game(&self, game_id: &str) -> Option<&TurnController> {
        self.games.get(game_id)
    }

    pub fn session_count(&self) -> usize {
        self.games.len()
    }

    /// Answers one request. `url` may carry a query string and trailing slash.
    pub fn handle(&mut self, method: &Method, url: &str, body: &str) -> Reply {
        let path = url.split('?').next().unwrap_or_default().trim_end_matches('/');
        match (method, path) {
            (Method::Get, "") => Self::running(),
            (Method::Get, "/status") => self.status(),
            (Method::Get, "/shutdown") => {
                event!(target: "rummy_player::server", Level::INFO, "shutdown requested");
                self.shutdown = true;
                Reply::ok()
            }
            (Method::Post, "/start-2p-game") => match parse::<GameInfo>(body) {
                Ok(info) => self.start_game(info),
                Err(reply) => reply,
            },
            (Method::Post, "/start-2p-hand") => match parse::<HandInfo>(body) {
                Ok(info) => self.start_hand(info),
                Err(reply) => reply,
            },
            (Method::Post, "/draw") => match parse::<UpdateInfo>(body) {
                Ok(info) => {
                    let controller = self.controller_for(info.game_id);
                    Reply::play(controller.decide_draw(&info.event).as_str())
                }
                Err(reply) => reply,
            },
            (Method::Post, "/lay-down") => match parse::<UpdateInfo>(body) {
                Ok(info) => {
                    let controller = self.controller_for(info.game_id);
                    Reply::play(controller.decide_lay_down(&info.event))
                }
                Err(reply) => reply,
            },
            (Method::Post, "/update-2p-game") => match parse::<UpdateInfo>(body) {
                Ok(info) => {
                    self.controller_for(info.game_id).update(&info.event);
                    Reply::ok()
                }
                Err(reply) => reply,
            },
            _ => {
                event!(
                    target: "rummy_player::server",
                    Level::DEBUG,
                    method = %method,
                    url,
                    "no route"
                );
                Reply::error(404, format!("no route for {method} {url}"))
            }
        }
    }

    fn running() -> Reply {
        Reply::json(200, &StatusReply { status: "Running" })
    }

    fn status(&self) -> Reply {
        Reply::json(
            200,
            &SessionsReply {
                status: "Running",
                player: self.player.clone(),
                games: self.games.values().map(TurnController::snapshot).collect(),
            },
        )
    }

    fn start_game(&mut self, info: GameInfo) -> Reply {
        let mut controller = self.new_controller();
        controller.start_game(&info.game_id, &info.opponent, &info.hand);
        self.order.retain(|id| *id != info.game_id);
        if !self.games.contains_key(&info.game_id) {
            self.make_room();
        }
        self.order.push_back(info.game_id.clone());
        self.games.insert(info.game_id.clone(), controller);
        self.latest = Some(info.game_id);
        Reply::ok()
    }

    fn start_hand(&mut self, info: HandInfo) -> Reply {
        self.controller_for(info.game_id).start_hand(&info.hand);
        Reply::ok()
    }

    fn new_controller(&mut self) -> TurnController {
        let seed = self.seed.wrapping_add(self.games_started);
        self.games_started += 1;
        TurnController::new(self.player.clone(), self.search, seed)
    }

    /// Drops the oldest sessions until one more fits.
    fn make_room(&mut self) {
        while self.games.len() >= MAX_SESSIONS {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            self.games.remove(&oldest);
            if self.latest.as_deref() == Some(oldest.as_str()) {
                self.latest = None;
            }
            event!(
                target: "rummy_player::server",
                Level::DEBUG,
                game_id = %oldest,
                "dropped oldest session"
            );
        }
    }

    /// The session for `game_id`, or the latest started game when none is given.
    /// Unknown games get a fresh session so decisions always have one to use;
    /// such a session never becomes the latest game.
    fn controller_for(&mut self, game_id: Option<String>) -> &mut TurnController {
        let game_id = game_id
            .filter(|id| !id.is_empty())
            .or_else(|| self.latest.clone())
            .unwrap_or_else(|| FALLBACK_GAME.to_string());
        if !self.games.contains_key(&game_id) {
            self.make_room();
            self.order.push_back(game_id.clone());
        }
        match self.games.entry(game_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                event!(
                    target: "rummy_player::server",
                    Level::WARN,
                    game_id = %entry.key(),
                    "request for unknown game; starting an empty session"
                );
                let seed = self.seed.wrapping_add(self.games_started);
                self.games_started += 1;
                entry.insert(TurnController::new(self.player.clone(), self.search, seed))
            }
        }
    }
}

fn parse<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, Reply> {
    serde_json::from_str(body).map_err(|err| {
        event!(
            target: "rummy_player::server",
            Level::WARN,
            error = %err,
            "rejected request body"
        );
        Reply::error(400, format!("invalid request body: {err}"))
    })
}

/// Serves requests on `addr` until a shutdown request arrives.
pub fn serve(addr: &str, mut service: PlayerService) -> Result<(), ServeError> {
    let server = Server::http(addr).map_err(|source| ServeError::Bind {
        addr: addr.to_string(),
        source,
    })?;
    event!(target: "rummy_player::server", Level::INFO, addr, "player listening");

    for mut request in server.incoming_requests() {
        let mut body = String::new();
        let reply = match request.as_reader().read_to_string(&mut body) {
            Ok(_) => {
                let method = request.method().clone();
                let url = request.url().to_string();
                service.handle(&method, &url, &body)
            }
            Err(err) => Reply::error(400, format!("unreadable request body: {err}")),
        };
        if let Err(err) = request.respond(reply.into_response()) {
            event!(
                target: "rummy_player::server",
                Level::WARN,
                error = %err,
                "failed to send response"
            );
        }
        if service.shutdown_requested() {
            break;
        }
    }

    event!(target: "rummy_player::server", Level::INFO, "player stopped");
    Ok(())
}
