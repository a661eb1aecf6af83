//! Message catalogs for the two supported UI languages.

use std::collections::HashMap;
use std::sync::LazyLock;

use serde::Serialize;

/// Cookie that overrides the browser language.
pub const LOCALE_COOKIE: &str = "lang";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Ru => "ru",
        }
    }

    /// Accepts bare and region-qualified tags such as `ru` or `ru-RU`.
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code.trim().split(['-', '_']).next()?.to_ascii_lowercase();
        match primary.as_str() {
            "en" => Some(Locale::En),
            "ru" => Some(Locale::Ru),
            _ => None,
        }
    }

    /// Picks the supported language with the highest `q` weight.
    pub fn from_accept_language(header: &str) -> Option<Self> {
        let mut candidates = header
            .split(',')
            .filter_map(|part| {
                let mut pieces = part.split(';');
                let locale = Locale::from_code(pieces.next()?)?;
                let weight = pieces
                    .find_map(|param| param.trim().strip_prefix("q="))
                    .and_then(|q| q.trim().parse::<f32>().ok())
                    .unwrap_or(1.0);
                Some((locale, weight))
            })
            .collect::<Vec<_>>();
        candidates.sort_by(|a, b| b.1.total_cmp(&a.1));
        candidates.first().map(|(locale, _)| *locale)
    }
}

const EN: &[(&str, &str)] = &[
    ("app.title", "Finance"),
    ("nav.expense_categories", "Expense categories"),
    ("nav.money_accounts", "Accounts"),
    ("nav.logout", "Sign out"),
    ("expense_categories.title", "Expense categories"),
    ("expense_categories.new", "New category"),
    ("expense_categories.edit", "Edit category"),
    ("expense_categories.empty", "No expense categories yet."),
    ("money_accounts.title", "Accounts"),
    ("money_accounts.new", "New account"),
    ("money_accounts.edit", "Edit account"),
    ("money_accounts.empty", "No accounts yet."),
    ("field.name", "Name"),
    ("field.description", "Description"),
    ("field.amount", "Amount"),
    ("field.balance", "Balance"),
    ("field.currency", "Currency"),
    ("field.account_number", "Account number"),
    ("field.created_at", "Created"),
    ("action.create", "Create"),
    ("action.save", "Save"),
    ("action.delete", "Delete"),
    ("action.cancel", "Cancel"),
    ("action.edit", "Edit"),
    ("action.search", "Search"),
    ("pagination.previous", "Previous"),
    ("pagination.next", "Next"),
    ("pagination.total", "Total"),
    ("flash.created", "Saved."),
    ("flash.updated", "Changes saved."),
    ("flash.deleted", "Deleted."),
    ("flash.unauthorized", "You do not have access to this section."),
    ("not_assigned.title", "No access"),
    (
        "not_assigned.body",
        "Your account has no access to the finance module. Ask an administrator to grant it.",
    ),
    ("validation.required", "This field is required."),
    ("validation.length", "The value is too long."),
    ("validation.amount", "Enter a non-negative number."),
    ("validation.currency", "Choose a valid currency."),
    ("validation.invalid", "The value is invalid."),
    ("error.internal", "Internal server error"),
];

const RU: &[(&str, &str)] = &[
    ("app.title", "Финансы"),
    ("nav.expense_categories", "Статьи расходов"),
    ("nav.money_accounts", "Счета"),
    ("nav.logout", "Выйти"),
    ("expense_categories.title", "Статьи расходов"),
    ("expense_categories.new", "Новая статья"),
    ("expense_categories.edit", "Редактирование статьи"),
    ("expense_categories.empty", "Статей расходов пока нет."),
    ("money_accounts.title", "Счета"),
    ("money_accounts.new", "Новый счёт"),
    ("money_accounts.edit", "Редактирование счёта"),
    ("money_accounts.empty", "Счетов пока нет."),
    ("field.name", "Название"),
    ("field.description", "Описание"),
    ("field.amount", "Сумма"),
    ("field.balance", "Баланс"),
    ("field.currency", "Валюта"),
    ("field.account_number", "Номер счёта"),
    ("field.created_at", "Создано"),
    ("action.create", "Создать"),
    ("action.save", "Сохранить"),
    ("action.delete", "Удалить"),
    ("action.cancel", "Отмена"),
    ("action.edit", "Изменить"),
    ("action.search", "Поиск"),
    ("pagination.previous", "Назад"),
    ("pagination.next", "Вперёд"),
    ("pagination.total", "Всего"),
    ("flash.created", "Сохранено."),
    ("flash.updated", "Изменения сохранены."),
    ("flash.deleted", "Удалено."),
    ("flash.unauthorized", "Недостаточно прав."),
    ("not_assigned.title", "Нет доступа"),
    (
        "not_assigned.body",
        "У вашей учётной записи нет доступа к финансам. Обратитесь к администратору.",
    ),
    ("validation.required", "Обязательное поле."),
    ("validation.length", "Слишком длинное значение."),
    ("validation.amount", "Введите неотрицательное число."),
    ("validation.currency", "Выберите корректную валюту."),
    ("validation.invalid", "Некорректное значение."),
    ("error.internal", "Внутренняя ошибка сервера"),
];

type Catalog = HashMap<&'static str, &'static str>;

static EN_CATALOG: LazyLock<Catalog> = LazyLock::new(|| EN.iter().copied().collect());

/// Russian entries layered over English so missing keys still resolve.
static RU_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    let mut catalog = EN_CATALOG.clone();
    catalog.extend(RU.iter().copied());
    catalog
});

/// Translates message keys for one request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Localizer {
    locale: Locale,
}

impl Localizer {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    /// Unknown keys are returned unchanged.
    pub fn t(&self, key: &str) -> String {
        self.catalog()
            .get(key)
            .map_or_else(|| key.to_string(), |message| (*message).to_string())
    }

    /// Full catalog, exposed to templates as `t`.
    pub fn catalog(&self) -> &'static Catalog {
        match self.locale {
            Locale::En => &EN_CATALOG,
            Locale::Ru => &RU_CATALOG,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locale_codes_are_parsed() {
        assert_eq!(Locale::from_code("ru-RU"), Some(Locale::Ru));
        assert_eq!(Locale::from_code("EN"), Some(Locale::En));
        assert_eq!(Locale::from_code("de"), None);
    }

    #[test]
    fn accept_language_respects_weights() {
        assert_eq!(
            Locale::from_accept_language("de-DE,en;q=0.5,ru;q=0.9"),
            Some(Locale::Ru)
        );
        assert_eq!(Locale::from_accept_language("fr, de"), None);
    }

    #[test]
    fn unknown_key_falls_back_to_key() {
        let localizer = Localizer::new(Locale::Ru);
        assert_eq!(localizer.t("field.name"), "Название");
        assert_eq!(localizer.t("no.such.key"), "no.such.key");
    }

    #[test]
    fn catalogs_cover_the_same_keys() {
        for (key, _) in EN {
            assert!(RU.iter().any(|(ru_key, _)| ru_key == key), "missing ru key {key}");
        }
    }
}
