use std::fmt;

use crate::error::{FlowError, Result};

pub const LIST_PATH: &str = "/";
pub const DETAIL_PATH: &str = "/movie_info";

/// Address of the list view: `/?mood=<mood>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListRoute {
    pub mood: Option<String>,
}

/// Address of the detail view: `/movie_info?id=<id>&mood=<mood>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetailRoute {
    pub id: String,
    pub mood: String,
}

impl ListRoute {
    pub fn for_mood(mood: impl Into<String>) -> Self {
        Self {
            mood: Some(mood.into()),
        }
    }

    pub fn home() -> Self {
        Self { mood: None }
    }

    /// Parse the query part (with or without the leading `?`).
    pub fn from_query(query: &str) -> Self {
        let mood = query_param(query, "mood").filter(|m| !m.trim().is_empty());
        Self { mood }
    }

    pub fn open(&self, movie_id: i64) -> DetailRoute {
        DetailRoute {
            id: movie_id.to_string(),
            mood: self.mood.clone().unwrap_or_default(),
        }
    }
}

impl fmt::Display for ListRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mood {
            Some(mood) => write!(f, "{}?mood={}", LIST_PATH, urlencoding::encode(mood)),
            None => f.write_str(LIST_PATH),
        }
    }
}

impl DetailRoute {
    /// Parse `id` and `mood` from a query string. A missing id is an error.
    pub fn from_query(query: &str) -> Result<Self> {
        let id = query_param(query, "id")
            .filter(|id| !id.trim().is_empty())
            .ok_or(FlowError::MissingId)?;
        let mood = query_param(query, "mood").unwrap_or_default();
        Ok(Self { id, mood })
    }

    /// The "Return" target: the list for the same mood.
    pub fn back(&self) -> ListRoute {
        if self.mood.trim().is_empty() {
            ListRoute::home()
        } else {
            ListRoute::for_mood(self.mood.clone())
        }
    }
}

impl fmt::Display for DetailRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}?id={}&mood={}",
            DETAIL_PATH,
            urlencoding::encode(&self.id),
            urlencoding::encode(&self.mood)
        )
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    let query = query.split_once('?').map_or(query, |(_, q)| q);
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (decode(key) == name).then(|| decode(value))
        })
        .next()
}

fn decode(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    match urlencoding::decode(&spaced) {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => spaced,
    }
}
