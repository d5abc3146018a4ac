//! Projection of an [`Order`] into display strings.
//!
//! [`render_order`] is pure: adapters (HTML page, terminal screen) only lay
//! out what it returns.

use crate::format::{
    display_or_placeholder, format_currency, format_date, format_timestamp, DisplayOptions,
};
use crate::order::{Delivery, Item, Order, Payment};

pub const DELIVERY_MISSING: &str = "Информация о доставке отсутствует";
pub const PAYMENT_MISSING: &str = "Информация об оплате отсутствует";
pub const NO_ITEMS: &str = "Товары не найдены";

/// Column headers of the items table, in row order.
pub const ITEM_COLUMNS: [&str; 6] = [
    "Название",
    "Бренд",
    "Цена",
    "Количество",
    "Итого",
    "Статус",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    pub value: String,
}

impl Field {
    fn new(label: &'static str, value: String) -> Self {
        Self { label, value }
    }
}

/// A block that is either a list of labelled values or a single notice that
/// the block is missing from the order.
#[derive(Debug, Clone, PartialEq)]
pub enum Section {
    Fields(Vec<Field>),
    Missing(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemRow {
    pub name: String,
    pub brand: String,
    pub price: String,
    pub quantity: String,
    pub total_price: String,
    pub status: String,
}

impl ItemRow {
    pub fn cells(&self) -> [&str; 6] {
        [
            self.name.as_str(),
            self.brand.as_str(),
            self.price.as_str(),
            self.quantity.as_str(),
            self.total_price.as_str(),
            self.status.as_str(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemsView {
    Rows(Vec<ItemRow>),
    /// Rendered as one full-width row.
    Empty(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct OrderView {
    pub header: Vec<Field>,
    pub delivery: Section,
    pub payment: Section,
    pub items: ItemsView,
}

pub fn render_order(order: &Order, options: &DisplayOptions) -> OrderView {
    OrderView {
        header: header_fields(order, options),
        delivery: order
            .delivery
            .as_ref()
            .map_or(Section::Missing(DELIVERY_MISSING), |d| {
                Section::Fields(delivery_fields(d))
            }),
        payment: order
            .payment
            .as_ref()
            .map_or(Section::Missing(PAYMENT_MISSING), |p| {
                Section::Fields(payment_fields(p, options))
            }),
        items: items_view(order),
    }
}

fn header_fields(order: &Order, options: &DisplayOptions) -> Vec<Field> {
    vec![
        Field::new("ID заказа", display_or_placeholder(&order.order_uid)),
        Field::new("Трек номер", display_or_placeholder(&order.track_number)),
        Field::new("Точка входа", display_or_placeholder(&order.entry)),
        Field::new("Локаль", display_or_placeholder(&order.locale)),
        Field::new("ID клиента", display_or_placeholder(&order.customer_id)),
        Field::new(
            "Служба доставки",
            display_or_placeholder(&order.delivery_service),
        ),
        Field::new(
            "Дата создания",
            format_date(order.date_created.as_deref(), options.timezone),
        ),
    ]
}

fn delivery_fields(delivery: &Delivery) -> Vec<Field> {
    vec![
        Field::new("Имя", display_or_placeholder(&delivery.name)),
        Field::new("Телефон", display_or_placeholder(&delivery.phone)),
        Field::new("Email", display_or_placeholder(&delivery.email)),
        Field::new("Адрес", display_or_placeholder(&delivery.address)),
        Field::new("Город", display_or_placeholder(&delivery.city)),
        Field::new("Регион", display_or_placeholder(&delivery.region)),
        Field::new("Почтовый индекс", display_or_placeholder(&delivery.zip)),
    ]
}

fn payment_fields(payment: &Payment, options: &DisplayOptions) -> Vec<Field> {
    let currency = payment.currency.as_deref();
    vec![
        Field::new("Транзакция", display_or_placeholder(&payment.transaction)),
        Field::new("Сумма", format_currency(payment.amount, currency)),
        Field::new("Валюта", display_or_placeholder(&payment.currency)),
        Field::new("Провайдер", display_or_placeholder(&payment.provider)),
        Field::new("Банк", display_or_placeholder(&payment.bank)),
        Field::new(
            "Стоимость доставки",
            format_currency(payment.delivery_cost, currency),
        ),
        Field::new(
            "Стоимость товаров",
            format_currency(payment.goods_total, currency),
        ),
        Field::new(
            "Дата оплаты",
            format_timestamp(payment.payment_dt, options.timezone),
        ),
    ]
}

fn items_view(order: &Order) -> ItemsView {
    let items = order.items();
    if items.is_empty() {
        return ItemsView::Empty(NO_ITEMS);
    }

    let currency = order.currency();
    ItemsView::Rows(
        items
            .iter()
            .map(|item| ItemRow {
                name: display_or_placeholder(&item.name),
                brand: display_or_placeholder(&item.brand),
                price: format_currency(item.price, currency),
                quantity: item_quantity(item).to_string(),
                total_price: format_currency(item.total_price, currency),
                status: display_or_placeholder(&item.status),
            })
            .collect(),
    )
}

/// `quantity` when set, else `total_price / price` rounded, else 1.
///
/// A zero price counts as missing, so the fallback never divides by zero.
pub fn item_quantity(item: &Item) -> i64 {
    if let Some(quantity) = item.quantity.filter(|q| *q != 0) {
        return quantity;
    }

    if let (Some(total), Some(price)) = (item.total_price, item.price) {
        if price != 0.0 {
            let derived = (total / price).round();
            if derived.is_finite() && derived != 0.0 {
                return derived as i64;
            }
        }
    }

    1
}
