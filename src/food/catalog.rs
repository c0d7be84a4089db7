use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Dal,
    Paneer,
    Chicken,
    Mutton,
    Fish,
    Rice,
    Bread,
    SouthIndian,
    Snack,
    CompleteMeal,
}

impl Category {
    pub fn is_meat(self) -> bool {
        matches!(self, Category::Chicken | Category::Mutton | Category::Fish)
    }
}

/// A food item as it leaves the catalog: display name plus nutrition per serving.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoodItem {
    pub name: String,
    pub calories: i32,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: i32,
    pub category: Category,
}

#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    pub key: &'static str,
    pub calories: i32,
    pub protein_g: f64,
    pub fiber_g: f64,
    pub sodium_mg: i32,
    pub category: Category,
}

impl CatalogEntry {
    pub fn to_item(&self, name: String) -> FoodItem {
        FoodItem {
            name,
            calories: self.calories,
            protein_g: self.protein_g,
            fiber_g: self.fiber_g,
            sodium_mg: self.sodium_mg,
            category: self.category,
        }
    }
}

const fn entry(
    key: &'static str,
    calories: i32,
    protein_g: f64,
    fiber_g: f64,
    sodium_mg: i32,
    category: Category,
) -> CatalogEntry {
    CatalogEntry { key, calories, protein_g, fiber_g, sodium_mg, category }
}

// Declaration order is significant: extraction takes the first entry that matches a line.
pub const CATALOG: &[CatalogEntry] = &[
    entry("dal tadka", 180, 9.0, 8.0, 400, Category::Dal),
    entry("paneer tikka", 250, 15.0, 2.0, 600, Category::Paneer),
    entry("chicken tikka", 220, 25.0, 1.0, 800, Category::Chicken),
    entry("butter chicken", 350, 20.0, 2.0, 900, Category::Chicken),
    entry("biryani", 450, 12.0, 3.0, 1200, Category::Rice),
    entry("roti", 120, 4.0, 2.0, 200, Category::Bread),
    entry("naan", 200, 6.0, 2.0, 400, Category::Bread),
    entry("rice", 200, 4.0, 1.0, 10, Category::Rice),
    entry("idli", 80, 3.0, 1.0, 150, Category::SouthIndian),
    entry("dosa", 150, 4.0, 2.0, 300, Category::SouthIndian),
    entry("samosa", 250, 4.0, 3.0, 500, Category::Snack),
    entry("chole", 220, 12.0, 10.0, 600, Category::Dal),
    entry("rajma", 200, 10.0, 8.0, 500, Category::Dal),
    entry("palak paneer", 180, 12.0, 4.0, 700, Category::Paneer),
    entry("masala dosa", 200, 6.0, 3.0, 400, Category::SouthIndian),
    entry("upma", 160, 4.0, 3.0, 350, Category::SouthIndian),
    entry("poha", 140, 3.0, 2.0, 300, Category::Snack),
    entry("paratha", 250, 6.0, 3.0, 500, Category::Bread),
    entry("thali", 600, 20.0, 12.0, 1500, Category::CompleteMeal),
];

pub fn lookup(key: &str) -> Option<&'static CatalogEntry> {
    let key = key.to_lowercase();
    CATALOG.iter().find(|entry| entry.key == key)
}

/// "paneer tikka" -> "Paneer tikka"
pub fn capitalize_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// "paneer tikka" -> "Paneer Tikka"
pub fn title_case(name: &str) -> String {
    name.split(' ')
        .map(capitalize_first)
        .collect::<Vec<_>>()
        .join(" ")
}
