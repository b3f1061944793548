pub mod audit_logs;
pub mod categories;
pub mod contact_messages;
pub mod newsletter_subscribers;
pub mod order_items;
pub mod orders;
pub mod product_images;
pub mod product_stats;
pub mod products;
pub mod settings;
pub mod testimonials;
pub mod users;

pub use audit_logs::Entity as AuditLogs;
pub use categories::Entity as Categories;
pub use contact_messages::Entity as ContactMessages;
pub use newsletter_subscribers::Entity as NewsletterSubscribers;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_images::Entity as ProductImages;
pub use product_stats::Entity as ProductStats;
pub use products::Entity as Products;
pub use settings::Entity as Settings;
pub use testimonials::Entity as Testimonials;
pub use users::Entity as Users;
