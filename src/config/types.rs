use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub scraper: ScraperConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub sheets: SheetsConfig,
    #[serde(default)]
    pub profiles: Vec<ProfileConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScraperConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Origin prepended to relative card links.
    #[serde(default = "default_site_origin")]
    pub site_origin: String,
    #[serde(default = "default_rate_limit")]
    pub rate_limit_per_second: f64,
    #[serde(default = "default_timeout")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    #[serde(default = "default_max_pages")]
    pub max_pages: usize,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            site_origin: default_site_origin(),
            rate_limit_per_second: default_rate_limit(),
            request_timeout_secs: default_timeout(),
            max_retries: default_retries(),
            max_pages: default_max_pages(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_max_entries")]
    pub max_entries: usize,
    #[serde(default = "default_page_ttl")]
    pub page_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_entries: default_max_entries(),
            page_ttl_secs: default_page_ttl(),
        }
    }
}

/// Access to the spreadsheet REST API shared by every sheet destination.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SheetsConfig {
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
    /// Environment variable holding the OAuth bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            api_base: default_sheets_api_base(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ProfileConfig {
    pub name: String,
    #[serde(default = "default_search_url")]
    pub search_url: String,
    #[serde(default)]
    pub destination: Destination,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Destination {
    Form(FormDestination),
    Sheet(SheetDestination),
    #[default]
    None,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct FormDestination {
    /// Endpoint receiving the urlencoded form post.
    pub url: String,
    pub address_field: String,
    pub price_field: String,
    pub link_field: String,
    #[serde(default = "default_confirmation_text")]
    pub confirmation_text: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct SheetDestination {
    pub url: String,
    #[serde(default = "default_worksheet")]
    pub worksheet: String,
    #[serde(default = "default_true")]
    pub append: bool,
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/136.0.0.0 Safari/537.36".into()
}

fn default_site_origin() -> String {
    "https://www.zillow.com".into()
}

fn default_rate_limit() -> f64 {
    0.5
}

fn default_timeout() -> u64 {
    30
}

fn default_retries() -> u32 {
    2
}

fn default_max_pages() -> usize {
    20
}

fn default_max_entries() -> usize {
    100
}

fn default_page_ttl() -> u64 {
    300
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com".into()
}

fn default_token_env() -> String {
    "GOOGLE_SHEETS_TOKEN".into()
}

fn default_search_url() -> String {
    "https://appbrewery.github.io/Zillow-Clone/".into()
}

fn default_confirmation_text() -> String {
    "Your response has been recorded".into()
}

fn default_worksheet() -> String {
    "Sheet1".into()
}

fn default_true() -> bool {
    true
}
