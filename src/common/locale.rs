// src/common/locale.rs

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

/// Idiomas suportados pelo site. O conjunto é fechado: qualquer outra tag
/// cai no [`Locale::DEFAULT`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    En,
    Ar,
    Fr,
    Tr,
    Ru,
}

/// Direção do texto associada ao idioma.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ltr,
    Rtl,
}

impl Locale {
    pub const DEFAULT: Locale = Locale::En;
    pub const ALL: [Locale; 5] = [Locale::En, Locale::Ar, Locale::Fr, Locale::Tr, Locale::Ru];

    pub const fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Fr => "fr",
            Locale::Tr => "tr",
            Locale::Ru => "ru",
        }
    }

    /// Membro exato do conjunto suportado, sem normalizar caixa.
    pub fn parse(tag: &str) -> Option<Locale> {
        Locale::ALL.into_iter().find(|locale| locale.as_str() == tag)
    }

    /// Resolve um segmento de URL para um idioma válido. Nunca falha:
    /// vazio, caixa diferente ou idioma ainda não traduzido viram o padrão.
    pub fn resolve(candidate: &str) -> Locale {
        Locale::parse(candidate).unwrap_or(Locale::DEFAULT)
    }

    pub const fn dir(self) -> Direction {
        match self {
            Locale::Ar => Direction::Rtl,
            _ => Direction::Ltr,
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Direction {
    pub const fn as_str(self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }
}

// ---
// Catálogos de mensagens
// ---

/// Documento JSON aninhado de um idioma. Chaves são caminhos com ponto
/// (ex: `"nav.home"`).
#[derive(Debug, Clone)]
pub struct MessageCatalog {
    root: Value,
}

impl MessageCatalog {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        let root: Value = serde_json::from_str(raw)?;
        Ok(Self { root })
    }

    fn empty() -> Self {
        Self { root: Value::Object(Default::default()) }
    }

    /// Busca `key`; se faltar (ou não for texto) devolve o `fallback` do chamador.
    pub fn t(&self, key: &str, fallback: &str) -> String {
        key.split('.')
            .try_fold(&self.root, |node, part| node.get(part))
            .and_then(Value::as_str)
            .unwrap_or(fallback)
            .to_string()
    }
}

/// Snapshot imutável de todos os catálogos, carregado uma vez no boot.
#[derive(Debug, Clone)]
pub struct MessageStore {
    catalogs: HashMap<Locale, MessageCatalog>,
}

impl MessageStore {
    /// Carrega os catálogos embutidos no binário (`messages/*.json`).
    /// Um catálogo inválido vira um catálogo vazio e é logado; as chamadas
    /// continuam funcionando com os textos de fallback.
    pub fn load_embedded() -> Self {
        let catalogs = Locale::ALL
            .into_iter()
            .map(|locale| {
                let catalog = MessageCatalog::from_json(embedded_source(locale)).unwrap_or_else(|e| {
                    tracing::error!(locale = %locale, error = %e, "Catálogo de mensagens inválido");
                    MessageCatalog::empty()
                });
                (locale, catalog)
            })
            .collect();

        Self { catalogs }
    }

    pub fn catalog(&self, locale: Locale) -> &MessageCatalog {
        // load_embedded preenche todos os idiomas; o `or` cobre só o default.
        self.catalogs
            .get(&locale)
            .or_else(|| self.catalogs.get(&Locale::DEFAULT))
            .unwrap_or(&EMPTY_CATALOG)
    }
}

static EMPTY_CATALOG: MessageCatalog = MessageCatalog { root: Value::Null };

fn embedded_source(locale: Locale) -> &'static str {
    match locale {
        Locale::En => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/messages/en.json")),
        Locale::Ar => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/messages/ar.json")),
        Locale::Fr => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/messages/fr.json")),
        Locale::Tr => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/messages/tr.json")),
        Locale::Ru => include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/messages/ru.json")),
    }
}
