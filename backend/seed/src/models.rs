use serde::Deserialize;

/// JSON export produced by the shop's back office.
#[derive(Deserialize, Default)]
#[serde(default)]
pub struct Export {
    pub categories: Vec<ExportCategory>,
    pub stores: Vec<ExportStore>,
    pub companies: Vec<ExportCompany>,
    pub users: Vec<ExportUser>,
    pub products: Vec<ExportProduct>,
}

#[derive(Deserialize)]
pub struct ExportCategory {
    pub name: String,
}

#[derive(Deserialize)]
pub struct ExportStore {
    pub name: String,
    #[serde(default)]
    pub address: String,
}

#[derive(Deserialize)]
pub struct ExportCompany {
    pub name: String,
    pub ico: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ExportUser {
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_role")]
    pub role: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price_cents: u32,
    /// Category name, created when missing.
    pub category: String,
    /// Store names.
    #[serde(default)]
    pub stores: Vec<String>,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_role() -> String {
    "user".to_string()
}

fn default_active() -> bool {
    true
}
