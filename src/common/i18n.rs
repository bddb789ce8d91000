// src/common/i18n.rs

use std::collections::HashMap;

use anyhow::Context;

// Catálogos embutidos no binário (locales/*.json)
const CATALOGS: &[(&str, &str)] = &[
    ("pt", include_str!("../../locales/pt.json")),
    ("en", include_str!("../../locales/en.json")),
];

/// Mensagens traduzidas por idioma ("pt" -> chave -> texto).
#[derive(Debug, Clone)]
pub struct I18nStore {
    catalogs: HashMap<String, HashMap<String, String>>,
    default_locale: String,
}

impl I18nStore {
    pub fn load(default_locale: &str) -> anyhow::Result<Self> {
        let mut catalogs = HashMap::new();
        for (lang, raw) in CATALOGS {
            let messages: HashMap<String, String> = serde_json::from_str(raw)
                .with_context(|| format!("Catálogo de mensagens inválido: {lang}"))?;
            catalogs.insert(lang.to_string(), messages);
        }

        if !catalogs.contains_key(default_locale) {
            anyhow::bail!("Idioma padrão sem catálogo: {default_locale}");
        }

        tracing::debug!("Catálogos carregados: {}", catalogs.len());

        Ok(Self {
            catalogs,
            default_locale: default_locale.to_string(),
        })
    }

    pub fn default_locale(&self) -> &str {
        &self.default_locale
    }

    pub fn supports(&self, locale: &str) -> bool {
        self.catalogs.contains_key(locale)
    }

    /// Traduz uma chave. Cai para o idioma padrão e, por último, devolve a própria chave.
    pub fn translate(&self, locale: &str, key: &str) -> String {
        self.translate_with(locale, key, &[])
    }

    /// Como `translate`, substituindo `{nome}` pelos valores informados.
    pub fn translate_with(&self, locale: &str, key: &str, args: &[(&str, String)]) -> String {
        let template = self
            .catalogs
            .get(locale)
            .and_then(|messages| messages.get(key))
            .or_else(|| {
                self.catalogs
                    .get(&self.default_locale)
                    .and_then(|messages| messages.get(key))
            })
            .map(String::as_str)
            .unwrap_or(key);

        args.iter().fold(template.to_string(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falls_back_to_default_locale_and_key() {
        let store = I18nStore::load("pt").unwrap();

        assert_eq!(store.translate("en", "duplicate_cnpj"), "CNPJ already registered.");
        assert_eq!(store.translate("fr", "duplicate_cnpj"), "CNPJ já cadastrado.");
        assert_eq!(store.translate("pt", "chave_inexistente"), "chave_inexistente");
    }

    #[test]
    fn replaces_placeholders() {
        let store = I18nStore::load("pt").unwrap();
        let text = store.translate_with("pt", "order_not_found", &[("id", "42".to_string())]);
        assert_eq!(text, "Pedido #42 não encontrado.");
    }

    #[test]
    fn rejects_unknown_default_locale() {
        assert!(I18nStore::load("de").is_err());
    }
}
