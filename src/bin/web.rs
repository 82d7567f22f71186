//! Battle web server: page from templates/, assets under /static, battle API under /api.
//! Run with: cargo run --bin web
//! Bind address and session key come from the environment, see `hustle_battle::config`.

use actix_files::Files;
use actix_session::{storage::CookieSessionStore, Session, SessionMiddleware};
use actix_web::{
    cookie::Key,
    get,
    http::header,
    post,
    web::{self, Data, Json, Path},
    App, HttpResponse, HttpServer, Responder,
};
use hustle_battle::config::ServerConfig;
use hustle_battle::export::{import_standings, write_round_history, write_summary};
use hustle_battle::{
    finalize_results, judge_and_check_for_win, next_round, start_battle, validate_votes, Battle,
    BattleId, Contestant, Crowning, JudgeResult, Role, SongInfo, Vote,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Instant;

/// Per-battle entry: battle data + last activity time (for auto-cleanup).
struct BattleEntry {
    battle: Battle,
    last_activity: Instant,
}

/// In-memory state: many battles by ID. Idle entries are removed by the cleanup task.
type AppState = Data<RwLock<HashMap<BattleId, BattleEntry>>>;

/// Session key holding the battle created from this browser.
const SESSION_BATTLE_KEY: &str = "battle_id";

#[derive(Serialize)]
struct HealthResponse {
    ok: bool,
    service: &'static str,
}

/// Names as a comma-separated string (form input) or a JSON array.
#[derive(Deserialize)]
#[serde(untagged)]
enum NameList {
    Csv(String),
    List(Vec<String>),
}

impl NameList {
    fn into_names(self) -> Vec<String> {
        match self {
            NameList::Csv(s) => s.split(',').map(str::to_string).collect(),
            NameList::List(v) => v,
        }
    }
}

#[derive(Deserialize)]
struct CreateBattleBody {
    leads: NameList,
    follows: NameList,
    judges: NameList,
}

#[derive(Deserialize)]
struct JudgeBody {
    votes: Vec<Vote>,
    #[serde(default)]
    song_info: Option<SongInfo>,
}

#[derive(Serialize)]
struct JudgeResponse {
    #[serde(flatten)]
    result: JudgeResult,
    /// Winner name, or "Tie between A and B" / "No Contest".
    winner: String,
    win_messages: Vec<String>,
    crownings: Vec<Crowning>,
    game_finished: bool,
}

#[derive(Serialize)]
struct StandingRow {
    rank: usize,
    name: String,
    points: u32,
}

#[derive(Serialize)]
struct StandingsResponse {
    leads: Vec<StandingRow>,
    follows: Vec<StandingRow>,
}

impl StandingsResponse {
    fn from_rows(leads: &[Contestant], follows: &[Contestant]) -> Self {
        let ranked = |rows: &[Contestant]| -> Vec<StandingRow> {
            rows.iter()
                .enumerate()
                .map(|(i, c)| StandingRow {
                    rank: i + 1,
                    name: c.name.clone(),
                    points: c.points,
                })
                .collect()
        };
        Self {
            leads: ranked(leads),
            follows: ranked(follows),
        }
    }
}

/// Path segment: battle id (e.g. /api/battles/{id})
#[derive(Deserialize)]
struct BattlePath {
    id: BattleId,
}

fn error_json(e: impl ToString) -> HttpResponse {
    HttpResponse::BadRequest().json(serde_json::json!({ "error": e.to_string() }))
}

/// Run `f` against a battle, refreshing its last activity. 404 if not found.
fn with_battle(state: &AppState, id: BattleId, f: impl FnOnce(&mut Battle) -> HttpResponse) -> HttpResponse {
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    match g.get_mut(&id) {
        Some(entry) => {
            entry.last_activity = Instant::now();
            f(&mut entry.battle)
        }
        None => HttpResponse::NotFound().json(serde_json::json!({ "error": "No battle" })),
    }
}

fn csv_download(bytes: Vec<u8>, filename: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", filename),
        ))
        .body(bytes)
}

#[get("/api/health")]
async fn api_health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        ok: true,
        service: "hustle-battle",
    })
}

/// No favicon; answer 204 so browsers stop asking.
#[get("/favicon.ico")]
async fn favicon() -> HttpResponse {
    HttpResponse::NoContent().finish()
}

/// Create a battle from name lists. The id is returned and remembered in the session cookie.
#[post("/api/battles")]
async fn api_create_battle(state: AppState, session: Session, body: Json<CreateBattleBody>) -> HttpResponse {
    let body = body.into_inner();
    let battle = match start_battle(
        &body.leads.into_names(),
        &body.follows.into_names(),
        &body.judges.into_names(),
    ) {
        Ok(b) => b,
        Err(e) => return error_json(e),
    };
    let id = battle.id;
    let view = battle.view();
    if let Err(e) = session.insert(SESSION_BATTLE_KEY, id) {
        log::warn!("Could not store battle {} in session: {}", id, e);
    }
    let mut g = match state.write() {
        Ok(guard) => guard,
        Err(_) => return HttpResponse::InternalServerError().body("lock error"),
    };
    g.insert(
        id,
        BattleEntry {
            battle,
            last_activity: Instant::now(),
        },
    );
    HttpResponse::Ok().json(view)
}

/// The battle created from this browser session.
#[get("/api/battles/current")]
async fn api_current_battle(state: AppState, session: Session) -> HttpResponse {
    match session.get::<BattleId>(SESSION_BATTLE_KEY) {
        Ok(Some(id)) => with_battle(&state, id, |b| HttpResponse::Ok().json(b.view())),
        Ok(None) => HttpResponse::NotFound().json(serde_json::json!({ "error": "No battle in session" })),
        Err(e) => error_json(e),
    }
}

/// Get a battle by id (404 if not found).
#[get("/api/battles/{id}")]
async fn api_get_battle(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_battle(&state, path.id, |b| HttpResponse::Ok().json(b.view()))
}

/// Judge one role of the current round. Song info, if given, is stored on the round. Whichever
/// role is judged last also runs the win check.
fn judge_role(state: &AppState, id: BattleId, role: Role, body: JudgeBody) -> HttpResponse {
    with_battle(state, id, |b| {
        if let Err(e) = validate_votes(b, &body.votes) {
            return error_json(e);
        }
        match judge_and_check_for_win(b, role, &body.votes) {
            Ok((result, crownings)) => {
                if body.song_info.is_some() {
                    b.current_round.song_info = body.song_info;
                }
                HttpResponse::Ok().json(JudgeResponse {
                    winner: result.outcome.to_string(),
                    result,
                    win_messages: crownings.iter().map(|c| c.to_string()).collect(),
                    crownings,
                    game_finished: b.is_finished(),
                })
            }
            Err(e) => error_json(e),
        }
    })
}

#[post("/api/battles/{id}/judge/leads")]
async fn api_judge_leads(state: AppState, path: Path<BattlePath>, body: Json<JudgeBody>) -> HttpResponse {
    judge_role(&state, path.id, Role::Lead, body.into_inner())
}

#[post("/api/battles/{id}/judge/follows")]
async fn api_judge_follows(state: AppState, path: Path<BattlePath>, body: Json<JudgeBody>) -> HttpResponse {
    judge_role(&state, path.id, Role::Follow, body.into_inner())
}

/// Advance to the next round (no-op once finished).
#[post("/api/battles/{id}/next-round")]
async fn api_next_round(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_battle(&state, path.id, |b| match next_round(b) {
        Ok(()) => HttpResponse::Ok().json(b.view()),
        Err(e) => error_json(e),
    })
}

/// Final (or current) standings, one ranked list per role.
#[post("/api/battles/{id}/finish")]
async fn api_finish(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_battle(&state, path.id, |b| {
        let standings = finalize_results(b);
        HttpResponse::Ok().json(StandingsResponse::from_rows(&standings.leads, &standings.follows))
    })
}

/// Round history as CSV.
#[get("/api/battles/{id}/export/rounds")]
async fn api_export_rounds(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_battle(&state, path.id, |b| {
        let mut buf = Vec::new();
        match write_round_history(b, &mut buf) {
            Ok(()) => csv_download(buf, export_filename("rounds")),
            Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
        }
    })
}

/// Standings and initial order as CSV.
#[get("/api/battles/{id}/export/summary")]
async fn api_export_summary(state: AppState, path: Path<BattlePath>) -> HttpResponse {
    with_battle(&state, path.id, |b| {
        let mut buf = Vec::new();
        match write_summary(b, &mut buf) {
            Ok(()) => csv_download(buf, export_filename("summary")),
            Err(e) => HttpResponse::InternalServerError().json(serde_json::json!({ "error": e.to_string() })),
        }
    })
}

/// Rebuild standings from an uploaded round history CSV (request body).
#[post("/api/standings/import")]
async fn api_import_standings(body: String) -> HttpResponse {
    match import_standings(body.as_bytes()) {
        Ok(s) => HttpResponse::Ok().json(StandingsResponse::from_rows(&s.leads, &s.follows)),
        Err(e) => error_json(e),
    }
}

fn export_filename(kind: &str) -> String {
    format!("battle-{}-{}.csv", kind, chrono::Utc::now().format("%Y%m%d-%H%M%S"))
}

fn session_key(config: &ServerConfig) -> Key {
    match &config.secret_key {
        Some(k) => Key::from(k.as_bytes()),
        None => {
            log::warn!("SECRET_KEY unset or shorter than 64 bytes; sessions will not survive a restart");
            Key::generate()
        }
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = ServerConfig::from_env();
    let key = session_key(&config);
    let secure = config.secure_cookies();
    log::info!(
        "Starting server at http://{}:{} ({:?})",
        config.host,
        config.port,
        config.environment
    );

    let state = Data::new(RwLock::new(HashMap::<BattleId, BattleEntry>::new()));

    // Background task: periodically remove battles idle past the inactivity timeout
    let state_cleanup = state.clone();
    let (cleanup_every, timeout) = (config.cleanup_interval, config.inactivity_timeout);
    actix_web::rt::spawn(async move {
        let mut interval = tokio::time::interval(cleanup_every);
        loop {
            interval.tick().await;
            let mut g = match state_cleanup.write() {
                Ok(guard) => guard,
                Err(_) => continue,
            };
            let before = g.len();
            g.retain(|_, entry| entry.last_activity.elapsed() < timeout);
            let removed = before - g.len();
            if removed > 0 {
                log::info!(
                    "Cleaned up {} inactive battle(s) (idle for {}h)",
                    removed,
                    timeout.as_secs() / 3600
                );
            }
        }
    });

    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(
                SessionMiddleware::builder(CookieSessionStore::default(), key.clone())
                    .cookie_secure(secure)
                    .build(),
            )
            .route("/", web::get().to(serve_index_async))
            .service(api_health)
            .service(favicon)
            .service(api_create_battle)
            .service(api_current_battle)
            .service(api_get_battle)
            .service(api_judge_leads)
            .service(api_judge_follows)
            .service(api_next_round)
            .service(api_finish)
            .service(api_export_rounds)
            .service(api_export_summary)
            .service(api_import_standings)
            .service(Files::new("/static", "static"))
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}

async fn serve_index_async() -> HttpResponse {
    let html = include_str!("../../templates/index.html");
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
