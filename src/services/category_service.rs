//! Category Service - the category tree
//!
//! The tree is assembled in memory from the flat category table. Each node
//! carries the cheapest SKU price found anywhere in its subtree. Stored data
//! is not trusted to be acyclic: every walk keeps a visited set.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use crate::domain::validation::{slugify, validate_text};
use crate::domain::{Category, CategoryChanges, CategoryNode, DomainError, Validate};
use crate::infrastructure::AppState;
use crate::infrastructure::cache::{get_json, keys, set_json};
use crate::services::double_option;

#[derive(Debug, Clone, Deserialize)]
pub struct CategoryInput {
    pub parent_id: Option<i32>,
    pub name: String,
    pub icon_url: Option<String>,
}

impl Validate for CategoryInput {
    fn validate(&self) -> Result<(), DomainError> {
        validate_text("name", &self.name, 2, 60)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    /// `null` moves the category to the root
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<i32>>,
    #[serde(default, deserialize_with = "double_option")]
    pub icon_url: Option<Option<String>>,
}

impl Validate for CategoryUpdate {
    fn validate(&self) -> Result<(), DomainError> {
        if let Some(name) = &self.name {
            validate_text("name", name, 2, 60)?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tree algorithms
// ---------------------------------------------------------------------------

/// Nest categories under their parents, sorted by name at every level.
///
/// Categories whose parent is missing are treated as roots.
pub fn build_tree(categories: &[Category], min_prices: &HashMap<i32, f64>) -> Vec<CategoryNode> {
    let known: HashSet<i32> = categories.iter().map(|c| c.id).collect();
    let mut children: HashMap<Option<i32>, Vec<&Category>> = HashMap::new();
    for category in categories {
        let parent = category.parent_id.filter(|p| known.contains(p));
        children.entry(parent).or_default().push(category);
    }
    for siblings in children.values_mut() {
        siblings.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    }

    fn build(
        category: &Category,
        children: &HashMap<Option<i32>, Vec<&Category>>,
        min_prices: &HashMap<i32, f64>,
        visited: &mut HashSet<i32>,
    ) -> CategoryNode {
        visited.insert(category.id);
        let mut nodes = Vec::new();
        for child in children.get(&Some(category.id)).into_iter().flatten() {
            if !visited.contains(&child.id) {
                nodes.push(build(child, children, min_prices, visited));
            }
        }

        let min_price = nodes
            .iter()
            .filter_map(|n| n.min_price)
            .chain(min_prices.get(&category.id).copied())
            .reduce(f64::min);

        CategoryNode {
            id: category.id,
            parent_id: category.parent_id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            icon_url: category.icon_url.clone(),
            min_price,
            children: nodes,
        }
    }

    let mut visited = HashSet::new();
    children
        .get(&None)
        .into_iter()
        .flatten()
        .map(|root| build(root, &children, min_prices, &mut visited))
        .collect()
}

/// Depth-first search for a node anywhere in the tree
pub fn find_node(tree: &[CategoryNode], id: i32) -> Option<&CategoryNode> {
    for node in tree {
        if node.id == id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, id) {
            return Some(found);
        }
    }
    None
}

/// Ancestor chain from the root down to `id` itself
pub fn lineage(categories: &[Category], id: i32) -> Vec<Category> {
    let by_id: HashMap<i32, &Category> = categories.iter().map(|c| (c.id, c)).collect();
    let mut chain = Vec::new();
    let mut visited = HashSet::new();
    let mut current = by_id.get(&id).copied();

    while let Some(category) = current {
        if !visited.insert(category.id) {
            tracing::warn!("Category cycle detected at {}", category.id);
            break;
        }
        chain.push(category.clone());
        current = category.parent_id.and_then(|p| by_id.get(&p).copied());
    }

    chain.reverse();
    chain
}

/// `id` followed by every category below it
pub fn descendant_ids(categories: &[Category], id: i32) -> Vec<i32> {
    let mut children: HashMap<i32, Vec<i32>> = HashMap::new();
    for category in categories {
        if let Some(parent) = category.parent_id {
            children.entry(parent).or_default().push(category.id);
        }
    }

    let mut result = vec![id];
    let mut visited: HashSet<i32> = HashSet::from([id]);
    let mut cursor = 0;
    while cursor < result.len() {
        let current = result[cursor];
        cursor += 1;
        for &child in children.get(&current).into_iter().flatten() {
            if visited.insert(child) {
                result.push(child);
            }
        }
    }
    result
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

pub async fn list_tree(state: &AppState) -> Result<Vec<CategoryNode>, DomainError> {
    if let Some(cached) = get_json(state.cache.as_ref(), keys::CATEGORY_TREE).await {
        return Ok(cached);
    }

    let categories = state.category_repo.find_all().await?;
    let min_prices = state.category_repo.min_prices().await?;
    let tree = build_tree(&categories, &min_prices);

    set_json(
        state.cache.as_ref(),
        keys::CATEGORY_TREE,
        &tree,
        state.cache_ttl,
    )
    .await;
    Ok(tree)
}

pub async fn invalidate_tree(state: &AppState) {
    state.cache.delete(keys::CATEGORY_TREE).await;
}

pub async fn get_category(state: &AppState, id: i32) -> Result<CategoryNode, DomainError> {
    let tree = list_tree(state).await?;
    find_node(&tree, id).cloned().ok_or(DomainError::NotFound)
}

pub async fn get_lineage(state: &AppState, id: i32) -> Result<Vec<Category>, DomainError> {
    let categories = state.category_repo.find_all().await?;
    let chain = lineage(&categories, id);
    if chain.is_empty() {
        return Err(DomainError::NotFound);
    }
    Ok(chain)
}

pub async fn get_descendant_ids(state: &AppState, id: i32) -> Result<Vec<i32>, DomainError> {
    let categories = state.category_repo.find_all().await?;
    if !categories.iter().any(|c| c.id == id) {
        return Err(DomainError::NotFound);
    }
    Ok(descendant_ids(&categories, id))
}

pub async fn is_leaf(state: &AppState, id: i32) -> Result<bool, DomainError> {
    Ok(state.category_repo.count_children(id).await? == 0)
}

/// Slug derived from `name`, suffixed `-2`, `-3`, ... until unused
async fn unique_slug(state: &AppState, name: &str, except: Option<i32>) -> Result<String, DomainError> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(DomainError::validation("name must contain letters or digits"));
    }

    let mut candidate = base.clone();
    let mut suffix = 2;
    while state.category_repo.slug_exists(&candidate, except).await? {
        candidate = format!("{}-{}", base, suffix);
        suffix += 1;
    }
    Ok(candidate)
}

pub async fn create_category(
    state: &AppState,
    input: CategoryInput,
) -> Result<Category, DomainError> {
    input.validate()?;

    if let Some(parent_id) = input.parent_id {
        state
            .category_repo
            .find_by_id(parent_id)
            .await?
            .ok_or(DomainError::NotFound)?;
    }

    let name = input.name.trim().to_string();
    let slug = unique_slug(state, &name, None).await?;
    let category = state
        .category_repo
        .create(input.parent_id, name, slug, input.icon_url)
        .await?;

    invalidate_tree(state).await;
    tracing::info!("Created category {} ({})", category.slug, category.id);
    Ok(category)
}

pub async fn update_category(
    state: &AppState,
    id: i32,
    input: CategoryUpdate,
) -> Result<Category, DomainError> {
    input.validate()?;

    state
        .category_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if let Some(Some(parent_id)) = input.parent_id {
        state
            .category_repo
            .find_by_id(parent_id)
            .await?
            .ok_or(DomainError::NotFound)?;

        let categories = state.category_repo.find_all().await?;
        if descendant_ids(&categories, id).contains(&parent_id) {
            return Err(DomainError::validation(
                "a category cannot be moved under itself or its descendants",
            ));
        }
    }

    let (name, slug) = match input.name {
        Some(name) => {
            let name = name.trim().to_string();
            let slug = unique_slug(state, &name, Some(id)).await?;
            (Some(name), Some(slug))
        }
        None => (None, None),
    };

    let category = state
        .category_repo
        .update(
            id,
            CategoryChanges {
                name,
                slug,
                parent_id: input.parent_id,
                icon_url: input.icon_url,
            },
        )
        .await?;

    invalidate_tree(state).await;
    Ok(category)
}

pub async fn delete_category(state: &AppState, id: i32) -> Result<(), DomainError> {
    state
        .category_repo
        .find_by_id(id)
        .await?
        .ok_or(DomainError::NotFound)?;

    if state.category_repo.count_children(id).await? > 0 {
        return Err(DomainError::validation(
            "category still has subcategories",
        ));
    }
    if state.category_repo.count_products(id).await? > 0 {
        return Err(DomainError::validation("category still has products"));
    }

    state.category_repo.delete(id).await?;
    invalidate_tree(state).await;
    tracing::info!("Deleted category {}", id);
    Ok(())
}
