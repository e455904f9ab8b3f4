use clap::{Args, Parser, ValueEnum};

#[derive(Clone, Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// Timeout for every outbound upstream call in seconds
    #[arg(long, env = "VITRINE_UPSTREAM_TIMEOUT_SECS", default_value_t = 7)]
    pub upstream_timeout_secs: u64,

    #[command(flatten)]
    pub server: ServerConfig,

    #[command(flatten)]
    pub cors: CorsConfig,

    #[command(flatten)]
    pub spotify: SpotifyConfig,

    #[command(flatten)]
    pub token_store: TokenStoreConfig,

    #[command(flatten)]
    pub github: GithubConfig,

    #[command(flatten)]
    pub unsplash: UnsplashConfig,

    #[command(flatten)]
    pub telemetry: TelemetryConfig,
}

#[derive(Clone, Debug, Args)]
pub struct ServerConfig {
    /// Host to listen on
    #[arg(long, env = "VITRINE_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "VITRINE_PORT", default_value_t = 3000)]
    pub port: u16,

    /// Directory of static assets served at the root (index.html, 404.html)
    #[arg(long, env = "VITRINE_PUBLIC_DIR", default_value = "public")]
    pub public_dir: String,
}

#[derive(Clone, Debug, Args)]
pub struct CorsConfig {
    /// Comma-separated list of origins allowed by CORS; empty allows any origin
    #[arg(long, env = "VITRINE_ALLOWED_ORIGINS", value_delimiter = ',', num_args = 0..)]
    pub allowed_origins: Vec<String>,
}

#[derive(Clone, Debug, Args)]
pub struct SpotifyConfig {
    /// Spotify application client id
    #[arg(long = "spotify-client-id", env = "VITRINE_SPOTIFY_CLIENT_ID")]
    pub client_id: String,

    /// Spotify application client secret
    #[arg(long = "spotify-client-secret", env = "VITRINE_SPOTIFY_CLIENT_SECRET")]
    pub client_secret: String,

    /// Static refresh token used as a seed until the token store holds one
    #[arg(long = "spotify-refresh-token", env = "VITRINE_SPOTIFY_REFRESH_TOKEN")]
    pub fallback_refresh_token: Option<String>,

    /// Base URL of the Spotify authorization server
    #[arg(
        long = "spotify-accounts-url",
        env = "VITRINE_SPOTIFY_ACCOUNTS_URL",
        default_value = "https://accounts.spotify.com"
    )]
    pub accounts_url: String,

    /// Base URL of the Spotify Web API
    #[arg(long = "spotify-api-url", env = "VITRINE_SPOTIFY_API_URL", default_value = "https://api.spotify.com")]
    pub api_url: String,

    /// Safety margin subtracted from token expiry in milliseconds
    #[arg(long = "spotify-expiry-buffer-ms", env = "VITRINE_SPOTIFY_EXPIRY_BUFFER_MS", default_value_t = 10_000)]
    pub expiry_buffer_ms: i64,
}

#[derive(Clone, Debug, Args)]
pub struct TokenStoreConfig {
    /// Base URL of the remote key-value token store (Upstash-style REST)
    #[arg(long = "kv-url", env = "VITRINE_KV_REST_API_URL")]
    pub url: String,

    /// Bearer token for the remote key-value store
    #[arg(long = "kv-token", env = "VITRINE_KV_REST_API_TOKEN")]
    pub token: String,

    /// Timeout for the readiness probe against the store in milliseconds
    #[arg(long = "kv-probe-timeout-ms", env = "VITRINE_KV_PROBE_TIMEOUT_MS", default_value_t = 2_000)]
    pub probe_timeout_ms: u64,
}

#[derive(Clone, Debug, Args)]
pub struct GithubConfig {
    /// GitHub user whose repositories are proxied
    #[arg(long = "github-username", env = "VITRINE_GITHUB_USERNAME")]
    pub username: String,

    /// Personal access token; raises the unauthenticated rate limit
    #[arg(long = "github-token", env = "VITRINE_GITHUB_ACCESS_TOKEN")]
    pub token: Option<String>,

    /// Base URL of the GitHub API
    #[arg(long = "github-api-url", env = "VITRINE_GITHUB_API_URL", default_value = "https://api.github.com")]
    pub api_url: String,

    /// Repo listing cache time-to-live in seconds
    #[arg(long = "github-cache-ttl-secs", env = "VITRINE_GITHUB_CACHE_TTL_SECS", default_value_t = 60)]
    pub cache_ttl_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct UnsplashConfig {
    /// Unsplash user whose collections are proxied
    #[arg(long = "unsplash-username", env = "VITRINE_UNSPLASH_USERNAME")]
    pub username: String,

    /// Unsplash access key, sent as Client-ID authorization
    #[arg(long = "unsplash-access-key", env = "VITRINE_UNSPLASH_ACCESS_KEY")]
    pub access_key: String,

    /// Base URL of the Unsplash API
    #[arg(long = "unsplash-api-url", env = "VITRINE_UNSPLASH_API_URL", default_value = "https://api.unsplash.com")]
    pub api_url: String,

    /// Collection and photo cache time-to-live in seconds
    #[arg(long = "unsplash-cache-ttl-secs", env = "VITRINE_UNSPLASH_CACHE_TTL_SECS", default_value_t = 120)]
    pub cache_ttl_secs: u64,
}

#[derive(Clone, Debug, Args)]
pub struct TelemetryConfig {
    /// Log output format
    #[arg(long, env = "VITRINE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

impl Config {
    pub fn load() -> Self {
        Self::parse()
    }
}
