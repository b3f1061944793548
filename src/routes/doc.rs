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
    carousel::{CarouselConfig, Navigation},
    dto::{
        admin::{
            AdminCategoryList, AdminProductList, CategoryInput, Direction, ImageAltRequest,
            ImageInput, ImageList, MetricRow, MoveRequest, Overview, ProductInput,
            RichTextRequest, RichTextResponse, SortOrderRequest, StockRequest,
        },
        auth::{LoginRequest, LoginResponse},
        catalog::{
            Breadcrumb, CarouselSet, CategoryDetail, CategoryList, HomeData, LikeCount,
            ListingData, ProductDetail, StockState, ViewCount,
        },
        contact::{ContactInfo, ContactMessageList, ContactRequest, ContactResponse},
        newsletter::{
            CampaignRequest, CampaignResult, OkResponse, RecipientError, SubscribeRequest,
            SubscriberList,
        },
        orders::{OrderLine, PlaceOrderRequest, PlaceOrderResponse},
        reviews::{CreateTestimonialRequest, ReviewPage},
    },
    error::ErrorBody,
    i18n::Locale,
    listing::{PageWindow, SortKey, SortOption},
    models::{Category, ContactMessage, NewsletterSubscriber, Product, ProductImage, Testimonial},
    response::{ApiResponse, Meta},
    richtext::{Command, Selection, ShadowPreset},
    routes::{admin, auth, catalog, contact, health, locale, newsletter, orders, redirect, revalidate, reviews},
    settings::{ParallaxBlock, ParallaxSettings, SiteSettings, TextStyle},
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
        auth::login,
        catalog::home,
        catalog::list_products,
        catalog::get_product,
        catalog::like_product,
        catalog::unlike_product,
        catalog::view_product,
        catalog::list_categories,
        catalog::get_category,
        redirect::product_redirect,
        reviews::list_testimonials,
        reviews::create_testimonial,
        reviews::review_page,
        newsletter::subscribe,
        contact::contact_info,
        contact::send_message,
        orders::place_order,
        revalidate::revalidate,
        locale::set_locale,
        locale::messages,
        admin::overview,
        admin::list_products,
        admin::create_product,
        admin::update_product,
        admin::delete_product,
        admin::move_product,
        admin::set_sort_order,
        admin::set_stock,
        admin::list_images,
        admin::add_image,
        admin::update_image,
        admin::delete_image,
        admin::move_image,
        admin::list_categories,
        admin::upsert_category,
        admin::delete_category,
        admin::move_category,
        admin::get_settings,
        admin::update_settings,
        admin::apply_rich_text,
        admin::send_campaign,
        admin::list_subscribers,
        admin::export_subscribers,
        admin::list_contact_messages
    ),
    components(
        schemas(
            Category,
            Product,
            ProductImage,
            Testimonial,
            NewsletterSubscriber,
            HomeData,
            ListingData,
            ProductDetail,
            CategoryDetail,
            CategoryList,
            Breadcrumb,
            StockState,
            LikeCount,
            ViewCount,
            CarouselSet,
            CarouselConfig,
            Navigation,
            SortKey,
            SortOption,
            PageWindow,
            ReviewPage,
            CreateTestimonialRequest,
            SubscribeRequest,
            OkResponse,
            ContactRequest,
            ContactResponse,
            ContactInfo,
            ContactMessage,
            ContactMessageList,
            CampaignRequest,
            CampaignResult,
            RecipientError,
            SubscriberList,
            OrderLine,
            PlaceOrderRequest,
            PlaceOrderResponse,
            LoginRequest,
            LoginResponse,
            Overview,
            MetricRow,
            ProductInput,
            CategoryInput,
            ImageInput,
            ImageAltRequest,
            ImageList,
            Direction,
            MoveRequest,
            SortOrderRequest,
            StockRequest,
            AdminProductList,
            AdminCategoryList,
            RichTextRequest,
            RichTextResponse,
            Selection,
            Command,
            ShadowPreset,
            SiteSettings,
            ParallaxSettings,
            ParallaxBlock,
            TextStyle,
            Locale,
            locale::LocaleRequest,
            locale::LocaleResponse,
            revalidate::RevalidateResponse,
            ErrorBody,
            Meta,
            ApiResponse<HomeData>,
            ApiResponse<ListingData>,
            ApiResponse<ProductDetail>,
            ApiResponse<Overview>,
            ApiResponse<SiteSettings>
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Catalog", description = "Public catalog, likes and views"),
        (name = "Reviews", description = "Customer testimonials"),
        (name = "Newsletter", description = "Newsletter sign-up"),
        (name = "Contact", description = "Contact form and reachability"),
        (name = "Orders", description = "Checkout"),
        (name = "Revalidate", description = "On-demand cache refresh"),
        (name = "I18n", description = "Language selection and dictionaries"),
        (name = "Admin", description = "Back-office endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
