use async_trait::async_trait;
use chess_shared::{
    domain::{GameId, Stats},
    protocol::{
        ApiReply, GameRequest, HintResponse, MoveRequest, MoveResponse, NewGameRequest,
        NewGameResponse, ResignResponse, StatsQuery, StatsResponse, TimersQuery, TimersResponse,
        BOT_MOVE_ROUTE, HINT_ROUTE, MOVE_ROUTE, NEW_GAME_ROUTE, RESIGN_ROUTE, STATS_ROUTE,
        TIMERS_ROUTE, UNDO_ROUTE,
    },
};
use reqwest::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;
use url::Url;

use crate::error::ClientError;

/// The remote game authority. It owns rules, bot play, clocks and stats.
#[async_trait]
pub trait GameApi: Send + Sync {
    async fn new_game(&self, request: &NewGameRequest) -> Result<NewGameResponse, ClientError>;
    async fn make_move(&self, request: &MoveRequest) -> Result<MoveResponse, ClientError>;
    async fn bot_move(&self, game_id: &GameId) -> Result<MoveResponse, ClientError>;
    async fn undo(&self, game_id: &GameId) -> Result<MoveResponse, ClientError>;
    async fn resign(&self, game_id: &GameId) -> Result<ResignResponse, ClientError>;
    async fn hint(&self, game_id: &GameId) -> Result<HintResponse, ClientError>;
    async fn stats(&self, username: &str) -> Result<Stats, ClientError>;
    async fn timers(&self, game_id: &GameId) -> Result<TimersResponse, ClientError>;
}

pub struct HttpGameApi {
    http: Client,
    base: Url,
}

impl HttpGameApi {
    pub fn new(server_url: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), server_url)
    }

    pub fn with_client(http: Client, server_url: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            base: normalize_base_url(server_url)?,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, route: &str) -> Result<Url, ClientError> {
        Ok(self.base.join(route.trim_start_matches('/'))?)
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T, ClientError>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        debug!(%url, "POST");
        let response = self.http.post(url).json(body).send().await?;
        decode_reply(response).await
    }

    async fn get<Q, T>(&self, route: &str, query: &Q) -> Result<T, ClientError>
    where
        Q: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.endpoint(route)?;
        debug!(%url, "GET");
        let response = self.http.get(url).query(query).send().await?;
        decode_reply(response).await
    }
}

/// Parses the body whatever the status code: the authority pairs 4xx codes
/// with an `error` field that must reach the player.
async fn decode_reply<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let status = response.status();
    let body = response.bytes().await?;
    let reply: ApiReply<T> = serde_json::from_slice(&body)
        .map_err(|err| ClientError::Decode(format!("HTTP {status}: {err}")))?;
    Ok(reply.into_result()?)
}

pub(crate) fn normalize_base_url(server_url: &str) -> Result<Url, ClientError> {
    let mut url = Url::parse(server_url.trim())?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(ClientError::UnsupportedScheme(url.scheme().to_string()));
    }
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

#[async_trait]
impl GameApi for HttpGameApi {
    async fn new_game(&self, request: &NewGameRequest) -> Result<NewGameResponse, ClientError> {
        self.post(NEW_GAME_ROUTE, request).await
    }

    async fn make_move(&self, request: &MoveRequest) -> Result<MoveResponse, ClientError> {
        self.post(MOVE_ROUTE, request).await
    }

    async fn bot_move(&self, game_id: &GameId) -> Result<MoveResponse, ClientError> {
        self.post(
            BOT_MOVE_ROUTE,
            &GameRequest {
                game_id: game_id.clone(),
            },
        )
        .await
    }

    async fn undo(&self, game_id: &GameId) -> Result<MoveResponse, ClientError> {
        self.post(
            UNDO_ROUTE,
            &GameRequest {
                game_id: game_id.clone(),
            },
        )
        .await
    }

    async fn resign(&self, game_id: &GameId) -> Result<ResignResponse, ClientError> {
        self.post(
            RESIGN_ROUTE,
            &GameRequest {
                game_id: game_id.clone(),
            },
        )
        .await
    }

    async fn hint(&self, game_id: &GameId) -> Result<HintResponse, ClientError> {
        self.post(
            HINT_ROUTE,
            &GameRequest {
                game_id: game_id.clone(),
            },
        )
        .await
    }

    async fn stats(&self, username: &str) -> Result<Stats, ClientError> {
        let response: StatsResponse = self
            .get(
                STATS_ROUTE,
                &StatsQuery {
                    username: username.to_string(),
                },
            )
            .await?;
        Ok(response.stats)
    }

    async fn timers(&self, game_id: &GameId) -> Result<TimersResponse, ClientError> {
        self.get(
            TIMERS_ROUTE,
            &TimersQuery {
                game_id: game_id.clone(),
            },
        )
        .await
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
