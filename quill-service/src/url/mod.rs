use quill_domain::{BlogPost, PublishStatus};

/// 根据标题生成URL安全的slug
/// 小写、去变音符号、空白折叠为连字符、去除其余非法字符
pub fn generate_slug(title: &str) -> String {
    if title.trim().is_empty() {
        return String::new();
    }

    let lowered: String = title.to_lowercase().chars().map(fold_diacritic).collect();

    let mut slug = String::with_capacity(lowered.len());
    for c in lowered.chars() {
        if c.is_whitespace() || c == '-' {
            // 连续的空白和连字符折叠为单个连字符
            if !slug.ends_with('-') {
                slug.push('-');
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() {
            slug.push(c);
        }
    }

    slug.trim_matches('-').to_string()
}

/// slug变化后是否需要记录重定向
pub fn needs_redirect(old_slug: &str, new_slug: &str) -> bool {
    !old_slug.is_empty() && !new_slug.is_empty() && old_slug != new_slug
}

/// 将带变音符号的拉丁字母折叠为ASCII基字母
fn fold_diacritic(c: char) -> char {
    match c {
        'à' | 'á' | 'â' | 'ã' | 'ä' | 'å' => 'a',
        'ç' => 'c',
        'è' | 'é' | 'ê' | 'ë' => 'e',
        'ì' | 'í' | 'î' | 'ï' => 'i',
        'ñ' => 'n',
        'ò' | 'ó' | 'ô' | 'õ' | 'ö' | 'ø' => 'o',
        'ù' | 'ú' | 'û' | 'ü' => 'u',
        'ý' | 'ÿ' => 'y',
        'š' => 's',
        'ž' => 'z',
        other => other,
    }
}

/// URL服务
/// 基于配置的站点基地址拼装各类公开链接
pub struct UrlService {
    base_url: String,
}

impl UrlService {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn post_url(&self, slug: &str) -> String {
        format!("{}/blog/{}", self.base_url, slug)
    }

    pub fn category_url(&self, category_slug: &str) -> String {
        format!("{}/category/{}", self.base_url, category_slug)
    }

    pub fn tag_url(&self, tag_slug: &str) -> String {
        format!("{}/tag/{}", self.base_url, tag_slug)
    }

    pub fn media_url(&self, username: &str, filename: &str) -> String {
        format!("{}/media/{}/{}", self.base_url, username, filename)
    }

    pub fn author_url(&self, username: &str) -> String {
        format!("{}/author/{}", self.base_url, username)
    }

    /// 已发布文章的规范链接，未发布时为空
    pub fn canonical_url(&self, post: &BlogPost) -> String {
        if post.status != PublishStatus::Published {
            return String::new();
        }
        self.post_url(&post.slug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_slug_strips_punctuation_and_diacritics() {
        assert_eq!(generate_slug("Hello, World! Café"), "hello-world-cafe");
    }

    #[test]
    fn test_generate_slug_blank_input() {
        assert_eq!(generate_slug("   "), "");
        assert_eq!(generate_slug(""), "");
    }

    #[test]
    fn test_generate_slug_collapses_hyphens() {
        assert_eq!(generate_slug("A--B"), "a-b");
        assert_eq!(generate_slug("  spaced   out  "), "spaced-out");
    }

    #[test]
    fn test_needs_redirect() {
        assert!(needs_redirect("old", "new"));
        assert!(!needs_redirect("same", "same"));
        assert!(!needs_redirect("", "new"));
        assert!(!needs_redirect("old", ""));
    }

    #[test]
    fn test_url_service_trims_trailing_slash() {
        let urls = UrlService::new("https://example.com/");
        assert_eq!(urls.post_url("hello"), "https://example.com/blog/hello");
        assert_eq!(
            urls.media_url("jane", "pic.png"),
            "https://example.com/media/jane/pic.png"
        );
    }
}
