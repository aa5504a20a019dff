//! Menu types: dishes, categories, and client-side menu queries.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use cloud_kitchen_core::{CategoryId, DishId, DishType, Price};

/// A dish as served by `GET /api/dishes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dish {
    #[serde(rename = "_id")]
    pub id: DishId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default)]
    pub image: String,
    /// Human-readable category name, e.g. `"Main Course"`.
    #[serde(default)]
    pub category: String,
    #[serde(rename = "type", default)]
    pub dish_type: Option<DishType>,
    #[serde(default = "default_available")]
    pub available: bool,
}

const fn default_available() -> bool {
    true
}

impl Dish {
    /// Slug of this dish's category, comparable with [`Category::slug`].
    #[must_use]
    pub fn category_slug(&self) -> String {
        slugify(&self.category)
    }

    /// Returns `true` for vegetarian dishes.
    #[must_use]
    pub fn is_veg(&self) -> bool {
        self.dish_type == Some(DishType::Veg)
    }
}

/// A menu category as served by `GET /api/categories`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    #[serde(rename = "_id")]
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

/// Turn a category name into its slug: lower-cased, whitespace runs
/// replaced with a single `-`.
///
/// ```
/// use cloud_kitchen_client::models::slugify;
///
/// assert_eq!(slugify("Main  Course"), "main-course");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Menu ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MenuSort {
    /// Keep the server's order.
    Server,
    /// Alphabetical by name.
    #[default]
    Name,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
}

impl std::str::FromStr for MenuSort {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "server" => Ok(Self::Server),
            "name" => Ok(Self::Name),
            "price-low" => Ok(Self::PriceLow),
            "price-high" => Ok(Self::PriceHigh),
            other => Err(format!(
                "invalid sort: {other} (expected name, price-low, price-high or server)"
            )),
        }
    }
}

/// Client-side filter and sort over a fetched menu.
#[derive(Debug, Clone, Default)]
pub struct MenuQuery {
    /// Category slug; `None` or `"all"` matches every dish.
    pub category: Option<String>,
    /// Case-insensitive substring matched against name and description.
    pub search: Option<String>,
    pub sort: MenuSort,
}

impl MenuQuery {
    /// Returns `true` if `dish` passes the category and search filters.
    #[must_use]
    pub fn matches(&self, dish: &Dish) -> bool {
        let category_ok = match self.category.as_deref() {
            None | Some("all") => true,
            Some(slug) => dish.category_slug() == slug,
        };

        let search_ok = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(needle) => {
                let needle = needle.to_lowercase();
                dish.name.to_lowercase().contains(&needle)
                    || dish.description.to_lowercase().contains(&needle)
            }
        };

        category_ok && search_ok
    }

    /// Filter then sort `dishes`. The sort is stable.
    #[must_use]
    pub fn apply<'a>(&self, dishes: &'a [Dish]) -> Vec<&'a Dish> {
        let mut result: Vec<&Dish> = dishes.iter().filter(|d| self.matches(d)).collect();
        match self.sort {
            MenuSort::Server => {}
            MenuSort::Name => result.sort_by(|a, b| compare_names(&a.name, &b.name)),
            MenuSort::PriceLow => result.sort_by(|a, b| a.price.cmp(&b.price)),
            MenuSort::PriceHigh => result.sort_by(|a, b| b.price.cmp(&a.price)),
        }
        result
    }
}

fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// Categories that contain at least one of `dishes`, in server order.
#[must_use]
pub fn populated_categories<'a>(categories: &'a [Category], dishes: &[Dish]) -> Vec<&'a Category> {
    categories
        .iter()
        .filter(|cat| dishes.iter().any(|d| d.category_slug() == cat.slug))
        .collect()
}
