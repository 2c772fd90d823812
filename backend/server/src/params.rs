//! # Search Params
//!
//! Filter state of list pages lives in the URL query string, the URL is the source
//! of truth and the typed struct is derived from it.
//!
//! ## Encoding
//! - `application/x-www-form-urlencoded`, fields in declaration order
//! - Absent fields and empty strings are omitted
//! - Booleans are `true`/`false`, anything else decodes as absent
//! - Unknown keys are ignored, a repeated key keeps its last value
//!
//! ## Navigation
//! Writing filters produces a [`Navigation`]. Shallow navigations only swap the
//! URL on the client and come back as JSON, deep ones are a `303` to the new
//! location so the page reloads its data.
use std::convert::Infallible;

use axum::{
    Json,
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use url::form_urlencoded::{Serializer, parse};

pub enum Param<'a> {
    Str(Option<&'a str>),
    Bool(Option<bool>),
}

/// Fixed, typed set of query fields of one page.
pub trait SearchParams: Default {
    /// Current values, in declaration order.
    fn fields(&self) -> Vec<(&'static str, Param<'_>)>;

    /// Applies one decoded pair, unknown keys are no-ops.
    fn set(&mut self, key: &str, raw: &str);

    fn decode(query: &str) -> Self {
        let mut params = Self::default();

        for (key, value) in parse(query.as_bytes()) {
            params.set(&key, &value);
        }

        params
    }

    fn encode(&self) -> String {
        let mut serializer = Serializer::new(String::new());

        for (key, param) in self.fields() {
            match param {
                Param::Str(Some(value)) if !value.is_empty() => {
                    serializer.append_pair(key, value);
                }
                Param::Bool(Some(value)) => {
                    serializer.append_pair(key, if value { "true" } else { "false" });
                }
                _ => {}
            }
        }

        serializer.finish()
    }

    fn href(&self, path: &str) -> String {
        let query = self.encode();

        if query.is_empty() {
            path.to_string()
        } else {
            format!("{path}?{query}")
        }
    }
}

/// Empty means absent. Whitespace is kept so decoding inverts encoding.
pub fn parse_str(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" => Some(true),
        "false" => Some(false),
        _ => None,
    }
}

/// Extracts `T` from the request's query string.
pub struct Params<T>(pub T);

impl<S, T> FromRequestParts<S> for Params<T>
where
    S: Send + Sync,
    T: SearchParams,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Params(T::decode(parts.uri.query().unwrap_or_default())))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum History {
    Push,
    #[default]
    Replace,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NavigateOptions {
    pub shallow: bool,
    pub history: History,
}

impl Default for NavigateOptions {
    fn default() -> Self {
        Self {
            shallow: true,
            history: History::Replace,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Navigation {
    pub href: String,
    pub shallow: bool,
    pub history: History,
}

pub fn navigate<T: SearchParams>(path: &str, params: &T, options: NavigateOptions) -> Navigation {
    Navigation {
        href: params.href(path),
        shallow: options.shallow,
        history: options.history,
    }
}

impl IntoResponse for Navigation {
    fn into_response(self) -> Response {
        if self.shallow {
            Json(self).into_response()
        } else {
            Redirect::to(&self.href).into_response()
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category_id: Option<String>,
    pub is_active: Option<bool>,
}

impl SearchParams for ProductFilters {
    fn fields(&self) -> Vec<(&'static str, Param<'_>)> {
        vec![
            ("search", Param::Str(self.search.as_deref())),
            ("categoryId", Param::Str(self.category_id.as_deref())),
            ("isActive", Param::Bool(self.is_active)),
        ]
    }

    fn set(&mut self, key: &str, raw: &str) {
        match key {
            "search" => self.search = parse_str(raw),
            "categoryId" => self.category_id = parse_str(raw),
            "isActive" => self.is_active = parse_bool(raw),
            _ => {}
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CategoryFilters {
    pub name: Option<String>,
}

impl SearchParams for CategoryFilters {
    fn fields(&self) -> Vec<(&'static str, Param<'_>)> {
        vec![("name", Param::Str(self.name.as_deref()))]
    }

    fn set(&mut self, key: &str, raw: &str) {
        if key == "name" {
            self.name = parse_str(raw);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CompanyFilters {
    pub search: Option<String>,
    pub is_active: Option<bool>,
}

impl SearchParams for CompanyFilters {
    fn fields(&self) -> Vec<(&'static str, Param<'_>)> {
        vec![
            ("search", Param::Str(self.search.as_deref())),
            ("isActive", Param::Bool(self.is_active)),
        ]
    }

    fn set(&mut self, key: &str, raw: &str) {
        match key {
            "search" => self.search = parse_str(raw),
            "isActive" => self.is_active = parse_bool(raw),
            _ => {}
        }
    }
}

/// Stores and users pages share a single free-text `q` field.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct QueryFilters {
    pub q: Option<String>,
}

impl SearchParams for QueryFilters {
    fn fields(&self) -> Vec<(&'static str, Param<'_>)> {
        vec![("q", Param::Str(self.q.as_deref()))]
    }

    fn set(&mut self, key: &str, raw: &str) {
        if key == "q" {
            self.q = parse_str(raw);
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CatalogFilters {
    pub search: Option<String>,
    /// Category slug.
    pub category: Option<String>,
    pub store_id: Option<String>,
}

impl SearchParams for CatalogFilters {
    fn fields(&self) -> Vec<(&'static str, Param<'_>)> {
        vec![
            ("search", Param::Str(self.search.as_deref())),
            ("category", Param::Str(self.category.as_deref())),
            ("storeId", Param::Str(self.store_id.as_deref())),
        ]
    }

    fn set(&mut self, key: &str, raw: &str) {
        match key {
            "search" => self.search = parse_str(raw),
            "category" => self.category = parse_str(raw),
            "storeId" => self.store_id = parse_str(raw),
            _ => {}
        }
    }
}
