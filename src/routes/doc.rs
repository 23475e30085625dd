use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        customers::{CustomerList, CustomerProfile, CustomerSummary, DeletedCustomer, UpdateProfileRequest},
        favorites::{AddFavoriteRequest, FavoriteCheck, FavoriteList, RemovedFavorite},
        products::{ProductList, ProductSearchQuery},
    },
    models::{Customer, Favorite, FavoriteView, Product, Rating},
    response::{ApiResponse, Meta},
    routes::{customers, favorites, health, products},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        products::list_products,
        products::get_product,
        products::list_by_category,
        products::search_products,
        favorites::add_favorite,
        favorites::list_favorites,
        favorites::check_favorite,
        favorites::remove_favorite,
        favorites::remove_favorite_by_product,
        customers::profile,
        customers::update_profile,
        customers::list_customers,
        customers::delete_customer
    ),
    components(
        schemas(
            Product,
            Rating,
            Favorite,
            FavoriteView,
            Customer,
            AddFavoriteRequest,
            FavoriteCheck,
            FavoriteList,
            RemovedFavorite,
            UpdateProfileRequest,
            CustomerProfile,
            CustomerSummary,
            CustomerList,
            DeletedCustomer,
            ProductList,
            ProductSearchQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<FavoriteView>,
            ApiResponse<FavoriteList>,
            ApiResponse<CustomerProfile>,
            ApiResponse<DeletedCustomer>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Cached catalog products"),
        (name = "Favorites", description = "Favorite products of the current customer"),
        (name = "Customer", description = "Customer profile and administration"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
