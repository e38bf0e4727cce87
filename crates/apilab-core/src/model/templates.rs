use super::types::{HttpMethod, Template, TemplateCategory};
use serde_json::json;

/// Accent colors offered for buttons, as (name, hex)
pub const COLORS: [(&str, &str); 8] = [
    ("Blue", "#3B82F6"),
    ("Green", "#10B981"),
    ("Purple", "#8B5CF6"),
    ("Pink", "#EC4899"),
    ("Orange", "#F59E0B"),
    ("Red", "#EF4444"),
    ("Gray", "#6B7280"),
    ("Indigo", "#6366F1"),
];

/// Icon names a button may use
pub const ICONS: [&str; 8] = [
    "Globe", "Code", "Database", "Send", "Download", "Upload", "Search", "Settings",
];

pub const DEFAULT_COLOR: &str = "#3B82F6";
pub const DEFAULT_ICON: &str = "Globe";

const JSON_CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Built-in templates for getting started
pub fn builtin() -> Vec<Template> {
    vec![
        Template {
            id: "get-users",
            name: "List Users",
            description: "Fetch a list of users with GET, the most basic way to read data",
            method: HttpMethod::Get,
            url: "https://jsonplaceholder.typicode.com/users",
            headers: vec![JSON_CONTENT_TYPE],
            body: None,
            category: TemplateCategory::Basic,
        },
        Template {
            id: "get-user",
            name: "Get User by ID",
            description: "Fetch a single user using a parameter in the URL",
            method: HttpMethod::Get,
            url: "https://jsonplaceholder.typicode.com/users/1",
            headers: vec![JSON_CONTENT_TYPE],
            body: None,
            category: TemplateCategory::Basic,
        },
        Template {
            id: "create-post",
            name: "Create Post",
            description: "Create a new post with POST, the method for creating resources",
            method: HttpMethod::Post,
            url: "https://jsonplaceholder.typicode.com/posts",
            headers: vec![JSON_CONTENT_TYPE],
            body: Some(pretty(json!({
                "title": "My first post",
                "body": "This is the content of my example post",
                "userId": 1
            }))),
            category: TemplateCategory::Basic,
        },
        Template {
            id: "update-post",
            name: "Update Post",
            description: "Update an existing post with PUT, which replaces the whole resource",
            method: HttpMethod::Put,
            url: "https://jsonplaceholder.typicode.com/posts/1",
            headers: vec![JSON_CONTENT_TYPE],
            body: Some(pretty(json!({
                "id": 1,
                "title": "Updated post",
                "body": "Modified post content",
                "userId": 1
            }))),
            category: TemplateCategory::Basic,
        },
        Template {
            id: "delete-post",
            name: "Delete Post",
            description: "Remove a post with DELETE, the method for deleting resources",
            method: HttpMethod::Delete,
            url: "https://jsonplaceholder.typicode.com/posts/1",
            headers: vec![JSON_CONTENT_TYPE],
            body: None,
            category: TemplateCategory::Basic,
        },
        Template {
            id: "github-user",
            name: "GitHub - User Profile",
            description: "Fetch a GitHub user's public profile",
            method: HttpMethod::Get,
            url: "https://api.github.com/users/octocat",
            headers: vec![("Accept", "application/vnd.github.v3+json")],
            body: None,
            category: TemplateCategory::Example,
        },
        Template {
            id: "cep-lookup",
            name: "Postal Code Lookup",
            description: "Look up a Brazilian address by postal code (CEP) using ViaCEP",
            method: HttpMethod::Get,
            url: "https://viacep.com.br/ws/01310-100/json/",
            headers: vec![JSON_CONTENT_TYPE],
            body: None,
            category: TemplateCategory::Example,
        },
    ]
}

/// Find a built-in template by id
pub fn find(id: &str) -> Option<Template> {
    builtin().into_iter().find(|t| t.id == id)
}

fn pretty(value: serde_json::Value) -> String {
    serde_json::to_string_pretty(&value).unwrap_or_else(|_| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_template_ids_are_unique() {
        let templates = builtin();
        let ids: HashSet<_> = templates.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_only_write_templates_carry_bodies() {
        for template in builtin() {
            if template.body.is_some() {
                assert!(template.method.accepts_body(), "{}", template.id);
            }
        }
    }

    #[test]
    fn test_template_bodies_are_valid_json() {
        for template in builtin() {
            if let Some(body) = &template.body {
                assert!(serde_json::from_str::<serde_json::Value>(body).is_ok());
            }
        }
    }

    #[test]
    fn test_find_template() {
        assert_eq!(find("create-post").unwrap().method, HttpMethod::Post);
        assert!(find("nope").is_none());
    }

    #[test]
    fn test_defaults_are_in_palette() {
        assert!(COLORS.iter().any(|(_, hex)| *hex == DEFAULT_COLOR));
        assert!(ICONS.contains(&DEFAULT_ICON));
    }
}
