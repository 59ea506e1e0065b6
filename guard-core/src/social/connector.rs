//! Social connectors.
//!
//! [`SocialConnector`] is the seam a real platform client would implement.
//! [`MockConnector`] fakes every platform: OAuth returns a demo account after
//! the configured delay, and fetched posts are generated locally.

use std::future::Future;
use std::time::Duration;

use chrono::Utc;
use log::{debug, info};

use super::error::{ConnectorError, Result};
use super::mock::generate_mock_posts;
use super::types::{PostVisibility, SocialAccount, SocialPlatform, SocialPost};
use crate::config::{GuardConfig, RiskThresholds};
use crate::exposure::PrivacyRiskLevel;
use crate::util::{generate_id, random_base36};

/// Client for one social platform.
///
/// Every operation other than `connect`/`disconnect` fails with
/// [`ConnectorError::NotConnected`] while no account is linked.
pub trait SocialConnector: Send {
    /// Platform this connector talks to.
    fn platform(&self) -> SocialPlatform;

    /// The linked account, if connected.
    fn account(&self) -> Option<&SocialAccount>;

    /// Runs the OAuth flow and links the account.
    fn connect(&mut self) -> impl Future<Output = Result<SocialAccount>> + Send;

    /// Forgets the linked account.
    fn disconnect(&mut self) -> impl Future<Output = ()> + Send;

    /// Fetches up to `limit` of the user's posts, newest first.
    fn fetch_posts(&mut self, limit: usize) -> impl Future<Output = Result<Vec<SocialPost>>> + Send;

    /// Publishes a new post.
    fn publish_post(
        &mut self,
        content: &str,
        visibility: PostVisibility,
    ) -> impl Future<Output = Result<SocialPost>> + Send;

    /// Changes who can see an existing post.
    fn update_post_visibility(
        &mut self,
        post_id: &str,
        visibility: PostVisibility,
    ) -> impl Future<Output = Result<()>> + Send;

    /// Deletes a post.
    fn delete_post(&mut self, post_id: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Credentials returned by the simulated OAuth flow.
#[derive(Clone, PartialEq, Eq)]
pub struct MockOAuthResponse {
    /// Opaque access token.
    pub access_token: String,
    /// Platform user id.
    pub user_id: String,
    /// Platform handle.
    pub username: String,
}

impl std::fmt::Debug for MockOAuthResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockOAuthResponse")
            .field("access_token", &"<redacted>")
            .field("user_id", &self.user_id)
            .field("username", &self.username)
            .finish()
    }
}

/// Waits `delay`, then returns demo credentials for `platform`.
pub async fn simulate_oauth(platform: SocialPlatform, delay: Duration) -> MockOAuthResponse {
    tokio::time::sleep(delay).await;
    issue_credentials(platform)
}

fn issue_credentials(platform: SocialPlatform) -> MockOAuthResponse {
    let user_suffix = random_base36(&mut rand::thread_rng(), 6);
    MockOAuthResponse {
        access_token: format!("mock_token_{platform}_{}", Utc::now().timestamp_millis()),
        user_id: format!("user_{user_suffix}"),
        username: format!("demo_user_{platform}"),
    }
}

/// OAuth scopes each platform grants the app.
#[must_use]
pub fn granted_scopes(platform: SocialPlatform) -> &'static [&'static str] {
    match platform {
        SocialPlatform::Facebook => &["read_my_posts", "publish_posts"],
        SocialPlatform::Instagram => &["read_my_posts"],
        SocialPlatform::Youtube => &["read_channel_data"],
    }
}

/// Stand-in connector for any [`SocialPlatform`].
#[derive(Debug, Clone)]
pub struct MockConnector {
    platform: SocialPlatform,
    account: Option<SocialAccount>,
    oauth_delay: Duration,
    api_delay: Duration,
    thresholds: RiskThresholds,
}

impl MockConnector {
    /// Creates a disconnected connector using the delays from `config`.
    #[must_use]
    pub fn new(platform: SocialPlatform, config: &GuardConfig) -> Self {
        Self {
            platform,
            account: None,
            oauth_delay: config.oauth_delay(),
            api_delay: config.api_delay(),
            thresholds: config.risk.clone(),
        }
    }

    /// Returns whether an account is linked.
    #[must_use]
    pub const fn is_connected(&self) -> bool {
        self.account.is_some()
    }

    const fn ensure_connected(&self) -> Result<()> {
        if self.account.is_some() {
            Ok(())
        } else {
            Err(ConnectorError::NotConnected(self.platform))
        }
    }

    fn generate_posts(&self, limit: usize) -> Vec<SocialPost> {
        generate_mock_posts(
            self.platform,
            limit,
            &mut rand::thread_rng(),
            Utc::now(),
            &self.thresholds,
        )
    }
}

impl SocialConnector for MockConnector {
    fn platform(&self) -> SocialPlatform {
        self.platform
    }

    fn account(&self) -> Option<&SocialAccount> {
        self.account.as_ref()
    }

    async fn connect(&mut self) -> Result<SocialAccount> {
        let oauth = simulate_oauth(self.platform, self.oauth_delay).await;

        let account = SocialAccount {
            platform: self.platform,
            connected: true,
            username: Some(oauth.username),
            user_id: Some(oauth.user_id),
            access_token: Some(oauth.access_token),
            permissions: granted_scopes(self.platform)
                .iter()
                .map(ToString::to_string)
                .collect(),
            connected_at: Some(Utc::now()),
        };

        info!("Connected {} account", self.platform);
        self.account = Some(account.clone());
        Ok(account)
    }

    async fn disconnect(&mut self) {
        if self.account.take().is_some() {
            info!("Disconnected {} account", self.platform);
        }
    }

    async fn fetch_posts(&mut self, limit: usize) -> Result<Vec<SocialPost>> {
        self.ensure_connected()?;
        let posts = self.generate_posts(limit);
        debug!("Fetched {} posts from {}", posts.len(), self.platform);
        Ok(posts)
    }

    async fn publish_post(
        &mut self,
        content: &str,
        visibility: PostVisibility,
    ) -> Result<SocialPost> {
        self.ensure_connected()?;

        let audience_size = match self.platform {
            SocialPlatform::Facebook if visibility == PostVisibility::Public => Some(1000),
            SocialPlatform::Facebook => Some(150),
            SocialPlatform::Instagram | SocialPlatform::Youtube => None,
        };

        Ok(SocialPost {
            id: generate_id(),
            platform: self.platform,
            content: content.to_string(),
            media_urls: None,
            posted_at: Utc::now(),
            visibility,
            audience_size,
            tags: None,
            location: None,
            mentions: None,
            risk_level: PrivacyRiskLevel::Low,
            risk_reasons: None,
        })
    }

    async fn update_post_visibility(
        &mut self,
        post_id: &str,
        visibility: PostVisibility,
    ) -> Result<()> {
        self.ensure_connected()?;
        tokio::time::sleep(self.api_delay).await;
        debug!("{}: post {post_id} visibility set to {visibility}", self.platform);
        Ok(())
    }

    async fn delete_post(&mut self, post_id: &str) -> Result<()> {
        self.ensure_connected()?;
        tokio::time::sleep(self.api_delay).await;
        debug!("{}: post {post_id} deleted", self.platform);
        Ok(())
    }
}

/// Returns a disconnected connector for a platform name (case-insensitive).
///
/// # Errors
///
/// Returns [`ConnectorError::UnknownPlatform`] for unsupported names.
pub fn connector_for(platform: &str, config: &GuardConfig) -> Result<MockConnector> {
    SocialPlatform::parse(platform)
        .map(|p| MockConnector::new(p, config))
        .ok_or_else(|| ConnectorError::UnknownPlatform(platform.to_string()))
}

/// Connects `connector` and fetches its first `fetch_limit` posts.
///
/// # Errors
///
/// Propagates connector failures.
pub async fn import_posts<C: SocialConnector>(
    connector: &mut C,
    fetch_limit: usize,
) -> Result<(SocialAccount, Vec<SocialPost>)> {
    let account = connector.connect().await?;
    let posts = connector.fetch_posts(fetch_limit).await?;
    Ok((account, posts))
}
