use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// SiteMetadata是站点级单例元数据（site.json）
/// 标签和分类集合只增不减，随文章的创建与更新累积
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteMetadata {
    #[serde(rename = "siteName")]
    pub site_name: String,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "baseUrl")]
    pub base_url: String,

    #[serde(rename = "postsPerPage")]
    pub posts_per_page: u32,

    #[serde(rename = "allTags", default)]
    pub all_tags: Vec<String>,

    #[serde(rename = "allCategories", default)]
    pub all_categories: Vec<String>,

    #[serde(rename = "lastUpdated")]
    pub last_updated: DateTime<Utc>,
}

impl SiteMetadata {
    /// 追加文章引入的新标签和新分类，返回是否有变化
    pub fn absorb(&mut self, tags: &[String], categories: &[String]) -> bool {
        let mut changed = false;

        for tag in tags {
            if !self.all_tags.contains(tag) {
                self.all_tags.push(tag.clone());
                changed = true;
            }
        }

        for category in categories {
            if !self.all_categories.contains(category) {
                self.all_categories.push(category.clone());
                changed = true;
            }
        }

        changed
    }
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            site_name: "My Blog".to_string(),
            description: String::new(),
            base_url: "/".to_string(),
            posts_per_page: 10,
            all_tags: Vec::new(),
            all_categories: Vec::new(),
            last_updated: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absorb_is_append_only() {
        let mut site = SiteMetadata::default();

        assert!(site.absorb(&["rust".to_string()], &["dev".to_string()]));
        assert!(!site.absorb(&["rust".to_string()], &[]));
        assert_eq!(site.all_tags, vec!["rust"]);
        assert_eq!(site.all_categories, vec!["dev"]);
    }
}
