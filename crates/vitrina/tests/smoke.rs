//! Smoke scenarios: the storefront's screens render and the primary
//! interactions respond.
//!
//! These drive a live Chromium against the remote storefront; run them with
//! `cargo test -- --ignored` on a machine with a Chromium binary and network
//! access.

mod common;

use vitrina::{expect, CartPage, HomePage, LoginModal, Navigable, ProductPage, VitrinaResult};

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st01_home_page_loads() -> VitrinaResult<()> {
    let session = common::start().await?;
    let home = HomePage::new(&session);

    expect(&home.product_titles()).to_be_visible().await?;
    assert!(home.product_titles().count().await? > 0);

    session.close().await
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st02_login_modal_opens() -> VitrinaResult<()> {
    let session = common::start().await?;
    let home = HomePage::new(&session);
    let login = LoginModal::new(&session);

    home.open_login_modal().await?;

    expect(&login.username_input()).to_be_visible().await?;
    expect(&login.password_input()).to_be_visible().await?;
    expect(&login.submit_button()).to_be_visible().await?;

    session.close().await
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st03_categories_load() -> VitrinaResult<()> {
    let session = common::start().await?;
    let home = HomePage::new(&session);

    for category in ["Phones", "Laptops", "Monitors"] {
        home.select_category(category).await?;
        expect(&home.product_titles()).to_be_visible().await?;
        assert!(home.product_titles().count().await? > 0);
    }

    session.close().await
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st04_product_details_open() -> VitrinaResult<()> {
    let session = common::start().await?;
    let home = HomePage::new(&session);
    let product = ProductPage::new(&session);

    home.select_product("Nexus 6").await?;

    expect(&product.name()).to_be_visible().await?;
    expect(&product.name()).to_match("Nexus 6").await?;
    expect(&product.price()).to_be_visible().await?;
    expect(&product.image()).to_be_visible().await?;

    session.close().await
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st05_add_to_cart_acknowledges() -> VitrinaResult<()> {
    let session = common::start().await?;
    let home = HomePage::new(&session);
    let product = ProductPage::new(&session);

    home.select_product("Nexus 6").await?;
    expect(&product.name()).to_match("Nexus 6").await?;

    product.add_to_cart().await?;
    let dialog = session
        .dialogs()
        .next(session.config().wait_timeout())
        .await?;
    assert!(dialog.matches("Product added")?);
    dialog.accept().await?;

    session.close().await
}

#[tokio::test(flavor = "multi_thread")]
#[ignore = "requires a Chromium binary and network access to the live storefront"]
async fn st06_cart_page_opens() -> VitrinaResult<()> {
    let session = common::start().await?;
    let cart = CartPage::new(&session);

    cart.open().await?;

    assert!(session.current_url().ends_with("/cart.html"));
    expect(&cart.place_order_button()).to_be_visible().await?;

    session.close().await
}
