// src/models/page.rs

use serde::Serialize;

use crate::{
    common::locale::{Direction, Locale, MessageCatalog},
    models::content::{QuickAction, Service, TravelPackage},
};

// Payload de uma página renderizada: o front só aplica o layout.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView<T: Serialize> {
    pub locale: Locale,
    pub dir: Direction,
    pub title: String,
    pub nav: Vec<NavLink>,
    pub body: T,
}

#[derive(Debug, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
}

impl<T: Serialize> PageView<T> {
    pub fn new(locale: Locale, catalog: &MessageCatalog, title: String, body: T) -> Self {
        Self {
            locale,
            dir: locale.dir(),
            title,
            nav: nav_links(locale, catalog),
            body,
        }
    }
}

fn nav_links(locale: Locale, catalog: &MessageCatalog) -> Vec<NavLink> {
    [
        ("nav.home", "Home", ""),
        ("nav.destinations", "Destinations", "/destinations"),
        ("nav.programs", "Programs", "/programs"),
        ("nav.medical", "Medical Tourism", "/medical-tourism"),
        ("nav.contact", "Contact Us", "/contact"),
    ]
    .into_iter()
    .map(|(key, fallback, path)| NavLink {
        label: catalog.t(key, fallback),
        href: format!("/{locale}{path}"),
    })
    .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeBody {
    pub subtitle: String,
    pub services: Vec<Service>,
    pub quick_actions: Vec<QuickAction>,
    pub packages: Vec<TravelPackage>,
}

#[derive(Debug, Serialize)]
pub struct ListBody<T> {
    pub subtitle: Option<String>,
    pub items: Vec<T>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactBody {
    pub sent: bool,
    pub confirmation: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginBody {
    pub error: Option<String>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardBody {
    pub editor: Option<String>,
    pub services: usize,
    pub trips: usize,
    pub packages: usize,
    pub quick_actions: usize,
    pub unread_messages: usize,
}
