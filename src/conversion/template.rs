//! Repository name templates
//!
//! Definitions carry repository names such as `"{package}_python"`. The only
//! placeholder is `{package}`; doubled braces stand for literal ones.

use crate::core::constants::PACKAGE_PLACEHOLDER;
use thiserror::Error;

/// Error types for template substitution
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("Unknown placeholder {{{name}}} in template {template:?}")]
    UnknownPlaceholder { template: String, name: String },

    #[error("Unbalanced brace in template {0:?}")]
    UnbalancedBrace(String),
}

/// Substitute the package name into a repository name template
pub fn render_repo_name(template: &str, package: &str) -> Result<String, TemplateError> {
    let mut rendered = String::with_capacity(template.len() + package.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                rendered.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(TemplateError::UnbalancedBrace(template.to_string()));
                        }
                        Some(c) => name.push(c),
                    }
                }
                if name != PACKAGE_PLACEHOLDER {
                    return Err(TemplateError::UnknownPlaceholder {
                        template: template.to_string(),
                        name,
                    });
                }
                rendered.push_str(package);
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                rendered.push('}');
            }
            '}' => return Err(TemplateError::UnbalancedBrace(template.to_string())),
            c => rendered.push(c),
        }
    }

    Ok(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_substitutes_package() {
        assert_eq!(
            render_repo_name("{package}_python", "media_delivery").unwrap(),
            "media_delivery_python"
        );
        assert_eq!(
            render_repo_name("php-{package}-{package}", "x").unwrap(),
            "php-x-x"
        );
    }

    #[test]
    fn test_template_without_placeholder() {
        assert_eq!(render_repo_name("fixed-repo", "pkg").unwrap(), "fixed-repo");
    }

    #[test]
    fn test_escaped_braces() {
        assert_eq!(render_repo_name("{{{package}}}", "pkg").unwrap(), "{pkg}");
    }

    #[test]
    fn test_unknown_placeholder() {
        let err = render_repo_name("{name}_sdk", "pkg").unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                template: "{name}_sdk".to_string(),
                name: "name".to_string(),
            }
        );
    }

    #[test]
    fn test_unbalanced_braces() {
        assert!(matches!(
            render_repo_name("{package", "pkg"),
            Err(TemplateError::UnbalancedBrace(_))
        ));
        assert!(matches!(
            render_repo_name("package}", "pkg"),
            Err(TemplateError::UnbalancedBrace(_))
        ));
    }
}
