use super::*;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use chess_shared::domain::{Color, GameStatus, PromotionPiece, Square, TimeControl};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Clone, Default)]
struct MockAuthority {
    bodies: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockAuthority {
    async fn record(&self, route: &str, body: Value) {
        self.bodies.lock().await.push((route.to_string(), body));
    }
}

fn start_rows() -> Value {
    serde_json::to_value(chess_shared::domain::Board::starting_position()).expect("board json")
}

async fn handle_new_game(
    State(mock): State<MockAuthority>,
    Json(body): Json<Value>,
) -> Json<Value> {
    mock.record("new_game", body).await;
    Json(json!({
        "game_id": "game-1",
        "board": start_rows(),
        "current_player": "white",
        "timers": {"white": 600, "black": 600},
        "status": "active",
        "timers_enabled": true
    }))
}

async fn handle_move(
    State(mock): State<MockAuthority>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.record("move", body.clone()).await;
    if body["to"] == "e5" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "Invalid move"})),
        );
    }
    (
        StatusCode::OK,
        Json(json!({
            "game_id": "game-1",
            "board": start_rows(),
            "move": "e2e4",
            "current_player": "black",
            "status": "active",
            "captured_pieces": {"white": [], "black": []},
            "timers": {"white": 597.25, "black": 600}
        })),
    )
}

async fn handle_game_only(
    State(mock): State<MockAuthority>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.record("game_only", body).await;
    (
        StatusCode::NOT_FOUND,
        Json(json!({"error": "Game not found"})),
    )
}

async fn handle_hint(
    State(mock): State<MockAuthority>,
    Json(body): Json<Value>,
) -> Json<Value> {
    mock.record("hint", body).await;
    Json(json!({"game_id": "game-1", "hint": "g1f3", "from_square": "g1", "to_square": "f3"}))
}

#[derive(serde::Deserialize)]
struct UsernameQuery {
    username: String,
}

async fn handle_stats(Query(query): Query<UsernameQuery>) -> Json<Value> {
    Json(json!({
        "username": query.username,
        "stats": {"games_played": 5, "wins": 3, "losses": 1, "draws": 1}
    }))
}

#[derive(serde::Deserialize)]
struct GameQuery {
    game_id: String,
}

async fn handle_timers(Query(query): Query<GameQuery>) -> Json<Value> {
    Json(json!({
        "game_id": query.game_id,
        "timers": {"white": 0, "black": 312.5},
        "status": "finished"
    }))
}

async fn handle_garbage() -> &'static str {
    "<html>internal error</html>"
}

async fn spawn_authority() -> (String, MockAuthority) {
    let mock = MockAuthority::default();
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api/new_game", post(handle_new_game))
        .route("/api/move", post(handle_move))
        .route("/api/bot_move", post(handle_garbage))
        .route("/api/undo", post(handle_game_only))
        .route("/api/hint", post(handle_hint))
        .route("/api/stats", get(handle_stats))
        .route("/api/timers", get(handle_timers))
        .with_state(mock.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), mock)
}

#[tokio::test]
async fn new_game_posts_labels_and_parses_snapshot() {
    let (server_url, mock) = spawn_authority().await;
    let api = HttpGameApi::new(&server_url).expect("api");

    let response = api
        .new_game(&NewGameRequest {
            username: "alice".into(),
            player_color: Color::White,
            time_control: TimeControl::TenMinutes,
        })
        .await
        .expect("new game");

    assert_eq!(response.game_id, GameId("game-1".into()));
    assert_eq!(response.board.piece_count(), 32);
    assert_eq!(response.status, GameStatus::Active);

    let bodies = mock.bodies.lock().await;
    assert_eq!(
        bodies[0].1,
        json!({"username": "alice", "player_color": "white", "time_control": "10 min"})
    );
}

#[tokio::test]
async fn move_request_carries_square_notation() {
    let (server_url, mock) = spawn_authority().await;
    let api = HttpGameApi::new(&server_url).expect("api");

    let response = api
        .make_move(&MoveRequest {
            game_id: GameId("game-1".into()),
            from: Square::from_notation("e2").expect("e2"),
            to: Square::from_notation("e4").expect("e4"),
            promotion: PromotionPiece::Queen,
        })
        .await
        .expect("move");

    assert_eq!(response.played.as_deref(), Some("e2e4"));
    assert_eq!(response.timers.expect("timers").white, 597.25);
    let bodies = mock.bodies.lock().await;
    assert_eq!(
        bodies[0].1,
        json!({"game_id": "game-1", "from": "e2", "to": "e4", "promotion": "q"})
    );
}

#[tokio::test]
async fn error_body_on_4xx_becomes_server_error() {
    let (server_url, _mock) = spawn_authority().await;
    let api = HttpGameApi::new(&server_url).expect("api");

    let err = api
        .make_move(&MoveRequest {
            game_id: GameId("game-1".into()),
            from: Square::from_notation("e2").expect("e2"),
            to: Square::from_notation("e5").expect("e5"),
            promotion: PromotionPiece::Queen,
        })
        .await
        .expect_err("illegal move");
    assert!(matches!(&err, ClientError::Server(message) if message == "Invalid move"));
    assert!(!err.is_transport());

    let err = api
        .undo(&GameId("missing".into()))
        .await
        .expect_err("unknown game");
    assert!(matches!(err, ClientError::Server(message) if message == "Game not found"));
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let (server_url, _mock) = spawn_authority().await;
    let api = HttpGameApi::new(&server_url).expect("api");

    let err = api
        .bot_move(&GameId("game-1".into()))
        .await
        .expect_err("garbage body");
    assert!(matches!(err, ClientError::Decode(_)));
    assert!(err.is_transport());
}

#[tokio::test]
async fn unreachable_server_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpGameApi::new(&format!("http://{addr}")).expect("api");
    let err = api.stats("alice").await.expect_err("nothing listening");
    assert!(matches!(err, ClientError::Transport(_)));
}

#[tokio::test]
async fn hint_stats_and_timers_parse() {
    let (server_url, mock) = spawn_authority().await;
    let api = HttpGameApi::new(&server_url).expect("api");
    let game_id = GameId("game-1".into());

    let hint = api.hint(&game_id).await.expect("hint");
    assert_eq!(hint.from_square.to_notation(), "g1");
    assert_eq!(hint.to_square.to_notation(), "f3");
    assert_eq!(
        mock.bodies.lock().await[0].1,
        json!({"game_id": "game-1"})
    );

    let stats = api.stats("alice smith").await.expect("stats");
    assert_eq!(stats.games, 5);
    assert_eq!(stats.wins, 3);

    let timers = api.timers(&game_id).await.expect("timers");
    assert_eq!(timers.status, GameStatus::Finished);
    assert_eq!(timers.timers.black, 312.5);
}

#[test]
fn base_url_gains_trailing_slash_and_keeps_prefix() {
    let url = normalize_base_url("http://localhost:5000").expect("url");
    assert_eq!(url.as_str(), "http://localhost:5000/");

    let api = HttpGameApi::new("https://chess.example.com/play").expect("api");
    assert_eq!(
        api.endpoint(MOVE_ROUTE).expect("endpoint").as_str(),
        "https://chess.example.com/play/api/move"
    );
}

#[test]
fn rejects_unusable_server_urls() {
    assert!(matches!(
        normalize_base_url("not a url"),
        Err(ClientError::InvalidServerUrl(_))
    ));
    assert!(matches!(
        normalize_base_url("ftp://example.com"),
        Err(ClientError::UnsupportedScheme(scheme)) if scheme == "ftp"
    ));
}
