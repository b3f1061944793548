use std::collections::BTreeMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType};
use uuid::Uuid;

use crate::{
    dto::orders::{OrderLine, PlaceOrderRequest, PlaceOrderResponse},
    entity::{
        order_items::ActiveModel as OrderItemActive,
        orders::ActiveModel as OrderActive,
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    state::AppState,
};

/// Drops non-positive quantities and merges duplicate products.
/// The result is ordered by product id, the order rows are locked in.
pub fn clean_items(items: &[OrderLine]) -> Vec<(Uuid, i32)> {
    let mut merged: BTreeMap<Uuid, i64> = BTreeMap::new();
    for line in items.iter().filter(|line| line.quantity > 0) {
        let qty = merged.entry(line.product_id).or_default();
        *qty = qty.saturating_add(line.quantity);
    }
    merged
        .into_iter()
        .map(|(id, qty)| (id, qty.min(i32::MAX as i64) as i32))
        .collect()
}

/// Places an order in one transaction: the product rows are locked,
/// stock is checked and decremented, and the order is stored at current prices.
pub async fn place_order(
    state: &AppState,
    payload: PlaceOrderRequest,
) -> AppResult<PlaceOrderResponse> {
    let items = clean_items(&payload.items);
    if items.is_empty() {
        return Err(AppError::BadRequest("INVALID_ITEMS".into()));
    }
    let email = payload
        .email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());

    let txn = state.orm.begin().await?;

    let ids: Vec<Uuid> = items.iter().map(|(id, _)| *id).collect();
    let products = Products::find()
        .filter(ProdCol::Id.is_in(ids))
        .order_by_asc(ProdCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?;

    let mut total_amount: i64 = 0;
    let mut priced: Vec<(Uuid, i32, i64)> = Vec::with_capacity(items.len());
    for (product_id, quantity) in &items {
        let product = products
            .iter()
            .find(|p| p.id == *product_id)
            .ok_or(AppError::OutOfStock(*product_id))?;
        if product.stock < *quantity {
            tracing::info!(product_id = %product_id, stock = product.stock, requested = *quantity, "order rejected");
            return Err(AppError::OutOfStock(*product_id));
        }
        total_amount += product.price * (*quantity as i64);
        priced.push((*product_id, *quantity, product.price));
    }

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        email: Set(email),
        total_amount: Set(total_amount),
        status: Set("pending".into()),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    for (product_id, quantity, price) in priced {
        OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product_id),
            quantity: Set(quantity),
            price: Set(price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(quantity))
            .filter(ProdCol::Id.eq(product_id))
            .exec(&txn)
            .await?;
    }

    txn.commit().await?;

    // stock badges on listings and detail pages changed
    state.cache.invalidate_prefix("/products").await;
    state.cache.invalidate_prefix("/category").await;

    tracing::info!(order_id = %order.id, total_amount, "order placed");
    Ok(PlaceOrderResponse {
        ok: true,
        order_id: order.id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: u128, quantity: i64) -> OrderLine {
        OrderLine {
            product_id: Uuid::from_u128(id),
            quantity,
        }
    }

    #[test]
    fn non_positive_quantities_are_dropped() {
        assert!(clean_items(&[line(1, 0), line(2, -3)]).is_empty());
        assert_eq!(clean_items(&[line(1, 0), line(2, 2)]), vec![(Uuid::from_u128(2), 2)]);
    }

    #[test]
    fn duplicates_merge_and_sort_by_id() {
        let cleaned = clean_items(&[line(9, 1), line(3, 2), line(9, 4)]);
        assert_eq!(
            cleaned,
            vec![(Uuid::from_u128(3), 2), (Uuid::from_u128(9), 5)]
        );
    }
}
