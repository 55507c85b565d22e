//! Robots exclusion.

use url::Url;

/// Decides whether a user agent may fetch a URL.
pub trait RobotsPolicy: Send + Sync {
    fn allowed(&self, user_agent: &str, url: &str) -> bool;
}

/// Policy that never refuses. Used when robots compliance is off.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl RobotsPolicy for AllowAll {
    fn allowed(&self, _user_agent: &str, _url: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Rule {
    allow: bool,
    path: String,
}

#[derive(Debug, Clone, Default)]
struct Group {
    /// Lowercased `User-agent` values.
    agents: Vec<String>,
    rules: Vec<Rule>,
}

/// Parsed robots.txt file.
///
/// A group applies to an agent when one of its `User-agent` names appears
/// in the agent's product token (the part before `/`, lowercased). The
/// first applicable group wins, the `*` group is the fallback, and inside a
/// group the first rule whose path prefixes the request path decides.
#[derive(Debug, Clone, Default)]
pub struct RobotsTxt {
    groups: Vec<Group>,
    default_group: Option<Group>,
}

impl RobotsTxt {
    pub fn parse(content: &str) -> Self {
        let mut robots = Self::default();
        let mut current = Group::default();
        let mut seen_rule = false;

        for line in content.lines() {
            let line = line.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }

            let Some((directive, value)) = line.split_once(':') else {
                continue;
            };
            let directive = directive.trim().to_lowercase();
            let value = value.trim();

            match directive.as_str() {
                "user-agent" => {
                    // Consecutive User-agent lines share one group.
                    if seen_rule {
                        robots.push_group(std::mem::take(&mut current));
                        seen_rule = false;
                    }
                    current.agents.push(value.to_lowercase());
                }
                "allow" | "disallow" => {
                    seen_rule = true;
                    // An empty Disallow allows everything.
                    if !value.is_empty() {
                        current.rules.push(Rule {
                            allow: directive == "allow",
                            path: value.to_string(),
                        });
                    }
                }
                _ => {}
            }
        }
        robots.push_group(current);

        robots
    }

    fn push_group(&mut self, group: Group) {
        if group.agents.is_empty() {
            return;
        }
        if group.agents.iter().any(|agent| agent == "*") {
            if self.default_group.is_none() {
                self.default_group = Some(group);
            }
        } else {
            self.groups.push(group);
        }
    }

    /// Path-level check; `path` should include the query string, if any.
    pub fn is_allowed(&self, user_agent: &str, path: &str) -> bool {
        let token = user_agent
            .split('/')
            .next()
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        let group = self
            .groups
            .iter()
            .find(|group| group.agents.iter().any(|agent| token.contains(agent.as_str())))
            .or(self.default_group.as_ref());

        let Some(group) = group else {
            return true;
        };

        group
            .rules
            .iter()
            .find(|rule| path.starts_with(&rule.path))
            .map(|rule| rule.allow)
            .unwrap_or(true)
    }
}

impl RobotsPolicy for RobotsTxt {
    fn allowed(&self, user_agent: &str, url: &str) -> bool {
        let Ok(parsed) = Url::parse(url) else {
            return true;
        };
        let path = match parsed.query() {
            Some(query) => format!("{}?{}", parsed.path(), query),
            None => parsed.path().to_string(),
        };
        self.is_allowed(user_agent, &path)
    }
}
