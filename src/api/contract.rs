//! Route table shared between the router and anything that needs to build request URLs.
//!
//! Each [`Contract`] names one operation: its method, its path template (`:param`
//! placeholders), the payload it accepts and the payloads it can answer with.

use http::{Method, StatusCode};

/// Payload shapes exchanged over the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    User,
    UserPatch,
    ActivityList,
    ChallengeList,
    Challenge,
    BadgeList,
    LeaderboardList,
    UploadRequest,
    AnalysisResponse,
    Message,
}

#[derive(Debug, Clone)]
pub struct Contract {
    pub name: &'static str,
    pub method: Method,
    pub path: &'static str,
    pub input: Option<Shape>,
    pub responses: &'static [(StatusCode, Shape)],
}

pub const USER_GET: Contract = Contract {
    name: "user.get",
    method: Method::GET,
    path: "/api/user",
    input: None,
    responses: &[(StatusCode::OK, Shape::User), (StatusCode::NOT_FOUND, Shape::Message)],
};

pub const USER_UPDATE: Contract = Contract {
    name: "user.update",
    method: Method::PATCH,
    path: "/api/user",
    input: Some(Shape::UserPatch),
    responses: &[(StatusCode::OK, Shape::User), (StatusCode::BAD_REQUEST, Shape::Message)],
};

pub const ACTIVITIES_LIST: Contract = Contract {
    name: "activities.list",
    method: Method::GET,
    path: "/api/activities",
    input: None,
    responses: &[(StatusCode::OK, Shape::ActivityList)],
};

pub const CHALLENGES_DAILY: Contract = Contract {
    name: "challenges.daily",
    method: Method::GET,
    path: "/api/challenges/daily",
    input: None,
    responses: &[(StatusCode::OK, Shape::ChallengeList)],
};

pub const CHALLENGES_COMPLETE: Contract = Contract {
    name: "challenges.complete",
    method: Method::POST,
    path: "/api/challenges/:id/complete",
    input: None,
    responses: &[
        (StatusCode::OK, Shape::Challenge),
        (StatusCode::NOT_FOUND, Shape::Message),
    ],
};

pub const BADGES_LIST: Contract = Contract {
    name: "badges.list",
    method: Method::GET,
    path: "/api/badges",
    input: None,
    responses: &[(StatusCode::OK, Shape::BadgeList)],
};

pub const LEADERBOARD_LIST: Contract = Contract {
    name: "leaderboard.list",
    method: Method::GET,
    path: "/api/leaderboard",
    input: None,
    responses: &[(StatusCode::OK, Shape::LeaderboardList)],
};

pub const UPLOAD_TEST: Contract = Contract {
    name: "upload.test",
    method: Method::POST,
    path: "/api/upload/test",
    input: Some(Shape::UploadRequest),
    responses: &[(StatusCode::OK, Shape::AnalysisResponse)],
};

pub const ALL: [Contract; 8] = [
    USER_GET,
    USER_UPDATE,
    ACTIVITIES_LIST,
    CHALLENGES_DAILY,
    CHALLENGES_COMPLETE,
    BADGES_LIST,
    LEADERBOARD_LIST,
    UPLOAD_TEST,
];

impl Contract {
    /// Path template in axum's `{param}` syntax.
    pub fn route_path(&self) -> String {
        self.path
            .split('/')
            .map(|segment| match segment.strip_prefix(':') {
                Some(param) => format!("{{{param}}}"),
                None => segment.to_string(),
            })
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Concrete URL for this contract with its placeholders filled in.
    pub fn url<V: ToString>(&self, params: &[(&str, V)]) -> String {
        build_url(self.path, params)
    }

    /// Whether a concrete request path matches this contract's template.
    pub fn matches(&self, method: &Method, path: &str) -> bool {
        if *method != self.method {
            return false;
        }

        let mut template = self.path.split('/');
        let mut concrete = path.split('/');
        loop {
            match (template.next(), concrete.next()) {
                (None, None) => return true,
                (Some(t), Some(c)) if t.starts_with(':') && !c.is_empty() => continue,
                (Some(t), Some(c)) if t == c => continue,
                _ => return false,
            }
        }
    }

    pub fn status_shape(&self, status: StatusCode) -> Option<Shape> {
        self.responses
            .iter()
            .find(|(code, _)| *code == status)
            .map(|(_, shape)| *shape)
    }
}

/// Replaces every `:key` path segment with its value; unknown keys are left alone.
pub fn build_url<V: ToString>(path: &str, params: &[(&str, V)]) -> String {
    path.split('/')
        .map(|segment| {
            segment
                .strip_prefix(':')
                .and_then(|name| params.iter().find(|(key, _)| *key == name))
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| segment.to_string())
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Looks up the contract serving `method` + `path`.
pub fn find(method: &Method, path: &str) -> Option<&'static Contract> {
    static TABLE: [Contract; 8] = ALL;
    TABLE.iter().find(|contract| contract.matches(method, path))
}

#[cfg(test)]
mod test {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn test_method_path_pairs_unique() {
        let pairs: HashSet<(Method, &str)> =
            ALL.iter().map(|c| (c.method.clone(), c.path)).collect();
        assert_eq!(pairs.len(), ALL.len());

        let names: HashSet<&str> = ALL.iter().map(|c| c.name).collect();
        assert_eq!(names.len(), ALL.len());
    }

    #[test]
    fn test_route_path_syntax() {
        assert_eq!(CHALLENGES_COMPLETE.route_path(), "/api/challenges/{id}/complete");
        assert_eq!(USER_GET.route_path(), "/api/user");
    }

    #[test]
    fn test_build_url() {
        assert_eq!(
            CHALLENGES_COMPLETE.url(&[("id", 2)]),
            "/api/challenges/2/complete"
        );
        assert_eq!(
            build_url("/api/challenges/:id/complete", &[("other", "x")]),
            "/api/challenges/:id/complete"
        );
        assert_eq!(build_url::<&str>("/api/badges", &[]), "/api/badges");
        assert_eq!(build_url("/a/:id/:idx", &[("idx", "9"), ("id", "1")]), "/a/1/9");
    }

    #[test]
    fn test_find_by_method_and_path() {
        assert_eq!(find(&Method::GET, "/api/user").map(|c| c.name), Some("user.get"));
        assert_eq!(find(&Method::PATCH, "/api/user").map(|c| c.name), Some("user.update"));
        assert_eq!(
            find(&Method::POST, "/api/challenges/17/complete").map(|c| c.name),
            Some("challenges.complete")
        );
        assert!(find(&Method::POST, "/api/challenges//complete").is_none());
        assert!(find(&Method::DELETE, "/api/user").is_none());
        assert!(find(&Method::GET, "/api/user/extra").is_none());
    }

    #[test]
    fn test_declared_error_shapes() {
        assert_eq!(
            CHALLENGES_COMPLETE.status_shape(StatusCode::NOT_FOUND),
            Some(Shape::Message)
        );
        assert_eq!(UPLOAD_TEST.input, Some(Shape::UploadRequest));
        assert_eq!(BADGES_LIST.status_shape(StatusCode::NOT_FOUND), None);
    }
}
