//! Catalog CRUD, referential integrity and the admin stock override.

mod common;

use boutik::prelude::*;
use common::*;

#[tokio::test]
async fn test_product_crud_roundtrip() {
    let app = test_app(test_config());

    let created = app
        .catalog
        .create_product(product_draft("Maillot domicile", 15_000, 10))
        .await
        .unwrap();
    let fetched = app.catalog.get_product(created.id).await.unwrap();
    assert_eq!(fetched, created);

    let mut update = product_draft("Maillot domicile 25/26", 18_000, 8);
    update.images = vec!["https://cdn.example.sn/p/1.jpg".to_string()];
    let updated = app.catalog.update_product(created.id, update).await.unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.price, Money::from_minor(18_000));
    assert_eq!(updated.images.len(), 1);

    app.catalog.delete_product(created.id).await.unwrap();
    let err = app.catalog.get_product(created.id).await.unwrap_err();
    assert_eq!(err.error_code(), "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_update_replaces_the_whole_size_set() {
    let app = test_app(test_config());
    let mut draft = product_draft("Maillot taillé", 15_000, 0);
    draft.sizes = vec![
        ProductSize {
            size: "S".to_string(),
            stock: 1,
        },
        ProductSize {
            size: "M".to_string(),
            stock: 2,
        },
    ];
    let created = app.catalog.create_product(draft).await.unwrap();

    let mut update = product_draft("Maillot taillé", 15_000, 0);
    update.sizes = vec![ProductSize {
        size: "XL".to_string(),
        stock: 4,
    }];
    let updated = app.catalog.update_product(created.id, update).await.unwrap();

    // Delete-all-then-insert semantics: S and M are gone
    assert_eq!(updated.sizes.len(), 1);
    assert!(updated.size("S").is_none());
    assert_eq!(updated.size("XL").unwrap().stock, 4);
}

#[tokio::test]
async fn test_validation_failures() {
    let app = test_app(test_config());

    let mut negative = product_draft("Maillot", 1000, 5);
    negative.price = Money::from_minor(-10);
    let err = app.catalog.create_product(negative).await.unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_ERROR");

    let mut duplicate = product_draft("Maillot", 1000, 0);
    duplicate.sizes = vec![
        ProductSize {
            size: "M".to_string(),
            stock: 1,
        },
        ProductSize {
            size: "M".to_string(),
            stock: 2,
        },
    ];
    let err = app.catalog.create_product(duplicate).await.unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_SIZE_LABEL");

    let mut orphan = product_draft("Maillot", 1000, 5);
    orphan.category_id = Some(Uuid::new_v4());
    let err = app.catalog.create_product(orphan).await.unwrap_err();
    assert_eq!(err.error_code(), "CATEGORY_NOT_FOUND");
}

#[tokio::test]
async fn test_deletion_blocked_while_referenced() {
    let app = test_app(test_config());
    let category = app
        .catalog
        .create_category(CategoryDraft {
            name: "Maillots".to_string(),
            description: String::new(),
            image: None,
        })
        .await
        .unwrap();
    let mut draft = product_draft("Maillot domicile", 15_000, 10);
    draft.category_id = Some(category.id);
    let product = app.catalog.create_product(draft).await.unwrap();

    // Category blocked while a product references it
    let err = app.catalog.delete_category(category.id).await.unwrap_err();
    assert_eq!(err.error_code(), "CATEGORY_IN_USE");

    // Product blocked once an order references it
    app.ledger
        .create_order(checkout(vec![line(&product, 1)]))
        .await
        .unwrap();
    let err = app.catalog.delete_product(product.id).await.unwrap_err();
    assert_eq!(err.error_code(), "PRODUCT_REFERENCED");

    // Unreferenced rows delete normally
    let loose = app
        .catalog
        .create_product(product_draft("Ballon", 500, 5))
        .await
        .unwrap();
    app.catalog.delete_product(loose.id).await.unwrap();
}

#[tokio::test]
async fn test_admin_stock_adjustment() {
    let app = test_app(test_config());
    let product = app
        .catalog
        .create_product(product_draft("Maillot", 1000, 2))
        .await
        .unwrap();

    assert_eq!(app.catalog.adjust_stock(product.id, None, 5).await.unwrap(), 7);
    assert_eq!(
        app.catalog.adjust_stock(product.id, None, -7).await.unwrap(),
        0
    );

    let err = app
        .catalog
        .adjust_stock(product.id, None, -1)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "STOCK_OUT_OF_RANGE");

    let err = app
        .catalog
        .adjust_stock(Uuid::new_v4(), None, 1)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "PRODUCT_NOT_FOUND");
}

#[tokio::test]
async fn test_listing_filters_and_pagination() {
    let app = test_app(test_config());
    let category = app
        .catalog
        .create_category(CategoryDraft {
            name: "Maillots".to_string(),
            description: String::new(),
            image: None,
        })
        .await
        .unwrap();

    for i in 0..3 {
        let mut draft = product_draft(&format!("Maillot {}", i), 1000, 5);
        draft.category_id = Some(category.id);
        app.catalog.create_product(draft).await.unwrap();
    }
    app.catalog
        .create_product(product_draft("Ballon taille 5", 500, 5))
        .await
        .unwrap();

    let by_category = app
        .catalog
        .list_products(&ProductFilter {
            category_id: Some(category.id),
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_category.len(), 3);

    let by_search = app
        .catalog
        .list_products(&ProductFilter {
            search: Some("ballon".to_string()),
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(by_search.len(), 1);

    let page = app
        .catalog
        .list_products(&ProductFilter {
            page: Some(2),
            page_size: Some(3),
            ..ProductFilter::default()
        })
        .await
        .unwrap();
    assert_eq!(page.len(), 1);
}

#[tokio::test]
async fn test_customer_registration() {
    let app = test_app(test_config());

    let customer = app
        .customers
        .register(CustomerDraft {
            name: "Awa Ndiaye".to_string(),
            email: "Awa@Example.SN".to_string(),
            phone: None,
        })
        .await
        .unwrap();
    assert_eq!(customer.email, "awa@example.sn");

    let err = app
        .customers
        .register(CustomerDraft {
            name: "Imposter".to_string(),
            email: "awa@example.sn".to_string(),
            phone: None,
        })
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_mutations_leave_an_audit_trail() {
    let app = test_app(test_config());
    let product = app
        .catalog
        .create_product(product_draft("Maillot", 1000, 5))
        .await
        .unwrap();
    app.ledger
        .create_order(checkout(vec![line(&product, 1)]))
        .await
        .unwrap();

    let entries = app.audit.recent(10).await.unwrap();
    // Newest first
    assert_eq!(entries[0].action, "order.created");
    assert_eq!(entries[0].actor, "storefront");
    assert_eq!(entries[1].action, "product.created");
    assert_eq!(entries[1].actor, "admin");
}
