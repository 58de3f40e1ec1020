//! User-facing strings.
//!
//! English is the default; Russian is selected with `BOT_LOCALE=ru`.

use std::str::FromStr;

use crate::errors::Error;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    En,
    Ru,
}

impl Locale {
    pub fn strings(self) -> &'static Strings {
        match self {
            Locale::En => &EN,
            Locale::Ru => &RU,
        }
    }
}

impl FromStr for Locale {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "" | "en" | "en-us" | "en-gb" => Ok(Locale::En),
            "ru" | "ru-ru" => Ok(Locale::Ru),
            other => Err(Error::Config(format!("unsupported BOT_LOCALE: {other}"))),
        }
    }
}

/// Keyboard button texts. These double as exact-match text triggers.
#[derive(Debug)]
pub struct MenuLabels {
    pub today: &'static str,
    pub tomorrow: &'static str,
    pub yesterday: &'static str,
    pub dangerous: &'static str,
    pub large: &'static str,
    pub small: &'static str,
    pub week: &'static str,
    pub picture: &'static str,
    pub chart: &'static str,
}

#[derive(Debug)]
pub struct Strings {
    pub menu: MenuLabels,
    pub greeting: &'static str,
    pub fallback: &'static str,
    pub fetch_failed: &'static str,

    // Size buckets, smallest first.
    pub size_labels: [&'static str; 6],

    // Record template.
    pub size_line: &'static str,
    pub velocity_line: &'static str,
    pub distance_line: &'static str,
    pub hazard_line: &'static str,
    pub meters: &'static str,
    pub kph: &'static str,
    pub km: &'static str,
    pub yes: &'static str,
    pub no: &'static str,

    // Headers; `{date}` is substituted.
    pub day_header: &'static str,
    pub dangerous_header: &'static str,
    pub large_header: &'static str,
    pub small_header: &'static str,
    pub week_header: &'static str,
    pub chart_title: &'static str,
    pub chart_axis: &'static str,

    // Empty results.
    pub no_data: &'static str,
    pub no_dangerous: &'static str,
    pub no_large: &'static str,
    pub no_small: &'static str,
    pub no_chart_data: &'static str,

    pub picture_link: &'static str,
}

impl Strings {
    /// Rows of the reply keyboard shown by the start command.
    pub fn keyboard(&self) -> Vec<Vec<String>> {
        let m = &self.menu;
        [
            vec![m.today, m.tomorrow],
            vec![m.yesterday, m.dangerous],
            vec![m.large, m.small],
            vec![m.chart, m.picture],
            vec![m.week],
        ]
        .into_iter()
        .map(|row| row.into_iter().map(str::to_string).collect())
        .collect()
    }
}

/// Replace `{date}` in a header template.
pub fn with_date(template: &str, date: &str) -> String {
    template.replace("{date}", date)
}

static EN: Strings = Strings {
    menu: MenuLabels {
        today: "📅 Today",
        tomorrow: "⏭ Tomorrow",
        yesterday: "⏮ Yesterday",
        dangerous: "⚠️ Dangerous",
        large: "🪐 Large",
        small: "🌑 Small",
        week: "📆 Week",
        picture: "🌌 Picture of the day",
        chart: "📊 Chart",
    },
    greeting: "Hi! I'm a NASA bot 🚀\nPick a command:",
    fallback: "Sorry, I didn't get that 🤔",
    fetch_failed: "⚠️ NASA data is unavailable right now. Please try again later.",
    size_labels: [
        "car-sized",
        "bus-sized",
        "building-sized",
        "stadium-sized",
        "multi-stadium-sized",
        "giant",
    ],
    size_line: "📏 Size",
    velocity_line: "🚀 Velocity",
    distance_line: "🌍 Distance",
    hazard_line: "⚠️ Hazardous",
    meters: "m",
    kph: "km/h",
    km: "km",
    yes: "Yes",
    no: "No",
    day_header: "Asteroids for {date}:",
    dangerous_header: "🚨 Dangerous asteroids {date}:",
    large_header: "🪐 Large asteroids {date}:",
    small_header: "🌑 Small asteroids {date}:",
    week_header: "📅 Asteroids for the week:",
    chart_title: "Asteroids {date}",
    chart_axis: "Distance to Earth (km)",
    no_data: "No data",
    no_dangerous: "🚀 No dangerous asteroids",
    no_large: "No large asteroids",
    no_small: "No small asteroids",
    no_chart_data: "No data to build a chart",
    picture_link: "Open",
};

static RU: Strings = Strings {
    menu: MenuLabels {
        today: "📅 Сегодня",
        tomorrow: "⏭ Завтра",
        yesterday: "⏮ Вчера",
        dangerous: "⚠️ Опасные",
        large: "🪐 Крупные",
        small: "🌑 Маленькие",
        week: "📆 Неделя",
        picture: "🌌 Фото дня",
        chart: "📊 График",
    },
    greeting: "Привет! Я бот NASA 🚀\nВыбери команду:",
    fallback: "Не понял 🤔",
    fetch_failed: "⚠️ Данные NASA сейчас недоступны. Попробуйте позже.",
    size_labels: [
        "как легковая машина 🚗",
        "как автобус 🚌",
        "как многоэтажный дом 🏢",
        "как футбольное поле ⚽",
        "как несколько футбольных полей 🏟️",
        "гигантский астероид 🌌",
    ],
    size_line: "📏 Размер",
    velocity_line: "🚀 Скорость",
    distance_line: "🌍 Расстояние",
    hazard_line: "⚠️ Опасный",
    meters: "м",
    kph: "км/ч",
    km: "км",
    yes: "Да",
    no: "Нет",
    day_header: "Астероиды за {date}:",
    dangerous_header: "🚨 Опасные астероиды {date}:",
    large_header: "🪐 Крупные астероиды {date}:",
    small_header: "🌑 Маленькие астероиды {date}:",
    week_header: "📅 Астероиды на неделю:",
    chart_title: "Астероиды {date}",
    chart_axis: "Расстояние до Земли (км)",
    no_data: "Нет данных",
    no_dangerous: "🚀 Опасных астероидов нет",
    no_large: "Крупных астероидов нет",
    no_small: "Маленьких астероидов нет",
    no_chart_data: "Нет данных для построения графика",
    picture_link: "Открыть",
};
