//! Path routing for the planner's views and the header navigation.
use thiserror::Error;

use crate::board::BoardLayout;

pub const APP_TITLE: &str = "Content Planer";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("no view at path '{0}'")]
    NotFound(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Ideation,
    Workflow,
    Tracking,
    ContentDetail(i64),
}

/// Header navigation link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavLink {
    pub label: &'static str,
    pub href: &'static str,
    pub route: Route,
}

pub static NAV_LINKS: [NavLink; 3] = [
    NavLink {
        label: "Ideation",
        href: "/ideation",
        route: Route::Ideation,
    },
    NavLink {
        label: "Workflow",
        href: "/workflow",
        route: Route::Workflow,
    },
    NavLink {
        label: "Tracking",
        href: "/tracking",
        route: Route::Tracking,
    },
];

impl Route {
    /// Resolve a URL path. `/` redirects to the ideation board.
    pub fn parse(path: &str) -> Result<Self, RouteError> {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let not_found = || RouteError::NotFound(path.to_string());
        let rest = match path.strip_prefix('/') {
            Some(rest) => rest.trim_end_matches('/'),
            None if path.is_empty() => "",
            None => return Err(not_found()),
        };
        let segments: Vec<&str> = if rest.is_empty() {
            Vec::new()
        } else {
            rest.split('/').collect()
        };
        match segments.as_slice() {
            [] => Ok(Route::Ideation),
            ["ideation"] => Ok(Route::Ideation),
            ["workflow"] => Ok(Route::Workflow),
            ["tracking"] => Ok(Route::Tracking),
            ["content", id] => id
                .parse()
                .map(Route::ContentDetail)
                .map_err(|_| not_found()),
            _ => Err(not_found()),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Ideation => "/ideation".to_string(),
            Route::Workflow => "/workflow".to_string(),
            Route::Tracking => "/tracking".to_string(),
            Route::ContentDetail(id) => format!("/content/{id}"),
        }
    }

    /// Board layout backing the route, for the two kanban views.
    pub fn layout(&self) -> Option<BoardLayout> {
        match self {
            Route::Ideation => Some(BoardLayout::ideation()),
            Route::Workflow => Some(BoardLayout::workflow()),
            _ => None,
        }
    }

    /// Nav link highlighted while this route is shown.
    pub fn active_link(&self) -> Option<&'static NavLink> {
        NAV_LINKS.iter().find(|link| link.route == *self)
    }
}
