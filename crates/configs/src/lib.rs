use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub tables: TablesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
    /// Largest accepted file upload body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            worker_threads: Some(4),
            frontend_dir: default_frontend_dir(),
            data_dir: default_data_dir(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 8080 }
fn default_frontend_dir() -> String { "frontend".into() }
fn default_data_dir() -> String { "data".into() }
fn default_max_upload_bytes() -> usize { 32 * 1024 * 1024 }

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    /// Remote backend-as-a-service over HTTP.
    Http,
    /// File-persisted store under `server.data_dir`.
    #[default]
    Local,
}

/// Account seeded into the local backend.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalAccount {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BackendConfig {
    #[serde(default)]
    pub kind: BackendKind,
    #[serde(default)]
    pub endpoint: String,
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub database_id: String,
    #[serde(default = "default_bucket_id")]
    pub bucket_id: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub accounts: Vec<LocalAccount>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            kind: BackendKind::Local,
            endpoint: String::new(),
            project_id: String::new(),
            api_key: String::new(),
            database_id: String::new(),
            bucket_id: default_bucket_id(),
            timeout_secs: default_timeout(),
            accounts: Vec::new(),
        }
    }
}

fn default_bucket_id() -> String { "files".into() }
fn default_timeout() -> u64 { 30 }

/// Table id per resource; each defaults to the resource slug.
#[derive(Debug, Clone, Deserialize)]
pub struct TablesConfig {
    #[serde(default = "t_companies")]
    pub companies: String,
    #[serde(default = "t_clients")]
    pub clients: String,
    #[serde(default = "t_products")]
    pub products: String,
    #[serde(default = "t_inks")]
    pub inks: String,
    #[serde(default = "t_payroll")]
    pub payroll: String,
    #[serde(default = "t_suppliers")]
    pub suppliers: String,
    #[serde(default = "t_orders")]
    pub orders: String,
    #[serde(default = "t_invoices")]
    pub invoices: String,
}

fn t_companies() -> String { "companies".into() }
fn t_clients() -> String { "clients".into() }
fn t_products() -> String { "products".into() }
fn t_inks() -> String { "inks".into() }
fn t_payroll() -> String { "payroll".into() }
fn t_suppliers() -> String { "suppliers".into() }
fn t_orders() -> String { "orders".into() }
fn t_invoices() -> String { "invoices".into() }

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            companies: t_companies(),
            clients: t_clients(),
            products: t_products(),
            inks: t_inks(),
            payroll: t_payroll(),
            suppliers: t_suppliers(),
            orders: t_orders(),
            invoices: t_invoices(),
        }
    }
}

impl TablesConfig {
    /// Look up the table id for a resource slug.
    pub fn get(&self, slug: &str) -> Option<&str> {
        let t = match slug {
            "companies" => &self.companies,
            "clients" => &self.clients,
            "products" => &self.products,
            "inks" => &self.inks,
            "payroll" => &self.payroll,
            "suppliers" => &self.suppliers,
            "orders" => &self.orders,
            "invoices" => &self.invoices,
            _ => return None,
        };
        Some(t.as_str())
    }

    fn entries(&self) -> [(&'static str, &str); 8] {
        [
            ("companies", &self.companies),
            ("clients", &self.clients),
            ("products", &self.products),
            ("inks", &self.inks),
            ("payroll", &self.payroll),
            ("suppliers", &self.suppliers),
            ("orders", &self.orders),
            ("invoices", &self.invoices),
        ]
    }
}

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load and validate the config file; a missing file yields defaults.
    pub fn load_or_default() -> Result<Self> {
        let path = config_path();
        let mut cfg = if std::path::Path::new(&path).exists() {
            load_from_file(&path)?
        } else {
            AppConfig::default()
        };
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize()?;
        self.backend.normalize_from_env();
        self.backend.validate()?;
        for (slug, table) in self.tables.entries() {
            if table.trim().is_empty() {
                return Err(anyhow!("tables.{slug} must not be empty"));
            }
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = default_host();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if self.data_dir.trim().is_empty() {
            self.data_dir = default_data_dir();
        }
        if self.max_upload_bytes == 0 {
            return Err(anyhow!("server.max_upload_bytes must be positive"));
        }
        Ok(())
    }
}

impl BackendConfig {
    /// Fill connection settings missing from TOML with environment variables.
    pub fn normalize_from_env(&mut self) {
        fill_from_env(&mut self.endpoint, "BACKEND_ENDPOINT");
        fill_from_env(&mut self.project_id, "BACKEND_PROJECT_ID");
        fill_from_env(&mut self.api_key, "BACKEND_API_KEY");
        fill_from_env(&mut self.database_id, "BACKEND_DATABASE_ID");
        if let Ok(bucket) = std::env::var("BACKEND_BUCKET_ID") {
            if !bucket.trim().is_empty() && self.bucket_id == default_bucket_id() {
                self.bucket_id = bucket;
            }
        }
        while self.endpoint.ends_with('/') {
            self.endpoint.pop();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(anyhow!("backend.timeout_secs must be a positive number of seconds"));
        }
        if self.kind == BackendKind::Local {
            return Ok(());
        }
        if self.endpoint.trim().is_empty() {
            return Err(anyhow!("backend.endpoint is empty; set it in config.toml or BACKEND_ENDPOINT"));
        }
        let lower = self.endpoint.to_lowercase();
        if !(lower.starts_with("http://") || lower.starts_with("https://")) {
            return Err(anyhow!("backend.endpoint must start with http:// or https://"));
        }
        if self.project_id.trim().is_empty() {
            return Err(anyhow!("backend.project_id is empty; set it in config.toml or BACKEND_PROJECT_ID"));
        }
        if self.database_id.trim().is_empty() {
            return Err(anyhow!("backend.database_id is empty; set it in config.toml or BACKEND_DATABASE_ID"));
        }
        if self.bucket_id.trim().is_empty() {
            return Err(anyhow!("backend.bucket_id must not be empty"));
        }
        Ok(())
    }
}

fn fill_from_env(slot: &mut String, var: &str) {
    if slot.trim().is_empty() {
        if let Ok(v) = std::env::var(var) {
            *slot = v;
        }
    }
}
