use std::str::FromStr;

use crate::domain::errors::ValidationError;
use crate::domain::models::Post;

/// Sort order over a post's immutable creation timestamp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "asc" => Ok(SortOrder::Ascending),
            "desc" => Ok(SortOrder::Descending),
            other => Err(ValidationError::UnknownSortOrder(other.to_string())),
        }
    }
}

/// Filter over the `used` flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsedFilter {
    #[default]
    All,
    Used,
    Unused,
}

impl UsedFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            UsedFilter::All => "all",
            UsedFilter::Used => "used",
            UsedFilter::Unused => "unused",
        }
    }

    /// The boolean a record's `used` flag must equal, if constrained
    pub fn required_value(&self) -> Option<bool> {
        match self {
            UsedFilter::All => None,
            UsedFilter::Used => Some(true),
            UsedFilter::Unused => Some(false),
        }
    }
}

impl FromStr for UsedFilter {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "all" => Ok(UsedFilter::All),
            "used" => Ok(UsedFilter::Used),
            "unused" => Ok(UsedFilter::Unused),
            other => Err(ValidationError::UnknownUsedFilter(other.to_string())),
        }
    }
}

/// The fixed category set; a post may also be uncategorized (`None`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    EmailMarketing,
    SeoAnalytics,
    WebDevelopment,
    Ecommerce,
}

impl Category {
    pub const ALL: [Category; 4] = [
        Category::EmailMarketing,
        Category::SeoAnalytics,
        Category::WebDevelopment,
        Category::Ecommerce,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::EmailMarketing => "Email Marketing",
            Category::SeoAnalytics => "SEO & Analytics",
            Category::WebDevelopment => "Web Development",
            Category::Ecommerce => "E-commerce",
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Email Marketing" => Ok(Category::EmailMarketing),
            "SEO & Analytics" => Ok(Category::SeoAnalytics),
            "Web Development" => Ok(Category::WebDevelopment),
            "E-commerce" => Ok(Category::Ecommerce),
            other => Err(ValidationError::UnknownCategory(other.to_string())),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Caller-owned view filter state, passed into every repository read.
/// Never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub sort: SortOrder,
    /// Exact-match category constraint; `None` means "all"
    pub category: Option<Category>,
    pub used: UsedFilter,
}

impl PostFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_used(mut self, used: UsedFilter) -> Self {
        self.used = used;
        self
    }

    /// Check whether a post passes the category and used constraints.
    /// Owner scoping is not part of the filter; it is mandatory on every
    /// query regardless.
    pub fn matches(&self, post: &Post) -> bool {
        if let Some(category) = self.category {
            if post.category != Some(category) {
                return false;
            }
        }

        if let Some(required) = self.used.required_value() {
            if post.used != required {
                return false;
            }
        }

        true
    }
}
