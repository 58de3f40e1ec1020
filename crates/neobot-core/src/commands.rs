//! Command routing: trigger text → command → fetch/filter/present → reply.
//!
//! Each invocation builds its own records and drops them once the reply is
//! produced; nothing is shared between invocations.

use std::sync::Arc;

use chrono::{Days, NaiveDate};

use crate::{
    chart::Bar,
    domain::{DateRange, FilterCriteria, PictureOfTheDay},
    errors::Error,
    filter::filter_records,
    formatting::{format_thousands, present_all},
    i18n::{with_date, Locale, Strings},
    messaging::types::{ChatAction, Reply, ReplyKeyboard},
    ports::{AstronomyApi, ChartRenderer},
    Result,
};

/// Minimum average diameter (m) for the "large" view.
pub const LARGE_MIN_DIAMETER_M: f64 = 100.0;
/// Maximum average diameter (m) for the "small" view.
pub const SMALL_MAX_DIAMETER_M: f64 = 20.0;
/// Days after today included in the week view.
pub const WEEK_SPAN_DAYS: u64 = 7;

const DAY_CAP: usize = 5;
const WEEK_CAP: usize = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    Start,
    Today,
    Tomorrow,
    Yesterday,
    Dangerous,
    Large,
    Small,
    Week,
    PictureOfTheDay,
    Chart,
}

impl Command {
    pub const ALL: [Command; 10] = [
        Command::Start,
        Command::Today,
        Command::Tomorrow,
        Command::Yesterday,
        Command::Dangerous,
        Command::Large,
        Command::Small,
        Command::Week,
        Command::PictureOfTheDay,
        Command::Chart,
    ];

    /// Slash-command names (without `/`) bound to this command.
    pub fn slash_names(self) -> &'static [&'static str] {
        match self {
            Command::Start => &["start", "help"],
            Command::Today => &["today"],
            Command::Tomorrow => &["tomorrow"],
            Command::Yesterday => &["yesterday"],
            Command::Dangerous => &["danger"],
            Command::Large => &["big"],
            Command::Small => &["small"],
            Command::Week => &["week"],
            Command::PictureOfTheDay => &["apod"],
            Command::Chart => &["chart"],
        }
    }

    /// Keyboard label for this command; the start command has no button.
    pub fn menu_label(self, locale: Locale) -> Option<&'static str> {
        let m = &locale.strings().menu;
        match self {
            Command::Start => None,
            Command::Today => Some(m.today),
            Command::Tomorrow => Some(m.tomorrow),
            Command::Yesterday => Some(m.yesterday),
            Command::Dangerous => Some(m.dangerous),
            Command::Large => Some(m.large),
            Command::Small => Some(m.small),
            Command::Week => Some(m.week),
            Command::PictureOfTheDay => Some(m.picture),
            Command::Chart => Some(m.chart),
        }
    }

    pub fn from_slash(name: &str) -> Option<Command> {
        Command::ALL
            .into_iter()
            .find(|c| c.slash_names().contains(&name))
    }

    pub fn from_menu_label(text: &str, locale: Locale) -> Option<Command> {
        Command::ALL
            .into_iter()
            .find(|c| c.menu_label(locale) == Some(text))
    }

    /// Indicator to show while the command runs.
    pub fn chat_action(self) -> ChatAction {
        match self {
            Command::Chart | Command::PictureOfTheDay => ChatAction::UploadPhoto,
            _ => ChatAction::Typing,
        }
    }

    /// Map raw chat text to a command. Matching is exact and case-sensitive.
    pub fn route(text: &str, locale: Locale) -> Option<Command> {
        if text.starts_with('/') {
            let (name, _args) = parse_slash(text);
            return Command::from_slash(name);
        }
        Command::from_menu_label(text, locale)
    }
}

/// Split `/cmd@botname args` into (`cmd`, `args`).
pub fn parse_slash(text: &str) -> (&str, &str) {
    let mut parts = text.trim().splitn(2, char::is_whitespace);
    let first = parts.next().unwrap_or("");
    let rest = parts.next().unwrap_or("").trim();

    let name = first
        .trim_start_matches('/')
        .split('@')
        .next()
        .unwrap_or("");
    (name, rest)
}

/// A fetch → filter → present view.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Listing {
    range: DateRange,
    criteria: FilterCriteria,
    cap: Option<usize>,
}

pub struct CommandRouter {
    api: Arc<dyn AstronomyApi>,
    chart: Arc<dyn ChartRenderer>,
    locale: Locale,
}

impl CommandRouter {
    pub fn new(api: Arc<dyn AstronomyApi>, chart: Arc<dyn ChartRenderer>, locale: Locale) -> Self {
        Self { api, chart, locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    fn strings(&self) -> &'static Strings {
        self.locale.strings()
    }

    /// Reply to free text or a slash command. Never fails: unknown input gets
    /// the fallback reply and failed commands get the "unavailable" reply.
    pub async fn respond(&self, text: &str, today: NaiveDate) -> Reply {
        let Some(command) = Command::route(text, self.locale) else {
            tracing::debug!(text, "unrecognized input");
            return Reply::text(self.strings().fallback);
        };

        match self.execute(command, today).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::warn!(?command, error = %e, "command failed");
                Reply::text(self.strings().fetch_failed)
            }
        }
    }

    /// Run one command against `today`.
    pub async fn execute(&self, command: Command, today: NaiveDate) -> Result<Reply> {
        tracing::info!(?command, %today, "executing command");
        let s = self.strings();

        match command {
            Command::Start => Ok(Reply::Menu {
                text: s.greeting.to_string(),
                keyboard: ReplyKeyboard::new(s.keyboard()),
            }),
            Command::PictureOfTheDay => {
                let picture = self.api.picture_of_the_day().await?;
                Ok(self.picture_reply(picture))
            }
            Command::Chart => self.chart_reply(today).await,
            listing => {
                let plan = plan_listing(listing, today)?;
                self.listing_reply(listing, plan).await
            }
        }
    }

    async fn listing_reply(&self, command: Command, plan: Listing) -> Result<Reply> {
        let s = self.strings();
        let date = plan.range.start_param();

        let (header, empty) = match command {
            Command::Dangerous => (with_date(s.dangerous_header, &date), s.no_dangerous),
            Command::Large => (with_date(s.large_header, &date), s.no_large),
            Command::Small => (with_date(s.small_header, &date), s.no_small),
            Command::Week => (s.week_header.to_string(), s.no_data),
            _ => (with_date(s.day_header, &date), s.no_data),
        };

        let days = self.api.neo_feed(plan.range).await?;
        let mut records = filter_records(days, &plan.criteria);
        if let Some(cap) = plan.cap {
            records.truncate(cap);
        }
        tracing::debug!(?command, count = records.len(), "records after filtering");

        let body = if records.is_empty() {
            empty.to_string()
        } else {
            present_all(&records, self.locale)?
        };
        Ok(Reply::Text(format!("{header}\n\n{body}")))
    }

    async fn chart_reply(&self, today: NaiveDate) -> Result<Reply> {
        let s = self.strings();
        let range = DateRange::single(today);
        let days = self.api.neo_feed(range).await?;
        let records = filter_records(days, &FilterCriteria::none());

        if records.is_empty() {
            return Ok(Reply::text(s.no_chart_data));
        }

        let bars = records
            .iter()
            .map(|r| -> Result<Bar> {
                Ok(Bar {
                    label: r.name.clone(),
                    value: r.miss_distance_km()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        let date = range.start_param();
        let bytes = self
            .chart
            .render_bars(&with_date(s.chart_title, &date), s.chart_axis, &bars)?;
        Ok(Reply::Photo {
            bytes,
            caption: Some(chart_caption(s, &date, &bars)),
        })
    }

    fn picture_reply(&self, picture: PictureOfTheDay) -> Reply {
        let s = self.strings();
        let caption = format!("🌌 {}\n\n{}", picture.title, picture.explanation);
        if picture.is_image() {
            Reply::PhotoUrl {
                url: picture.url,
                caption: Some(caption),
            }
        } else {
            Reply::Text(format!("{caption}\n\n{}: {}", s.picture_link, picture.url))
        }
    }
}

fn plan_listing(command: Command, today: NaiveDate) -> Result<Listing> {
    let shifted = |forward: bool| {
        let d = Days::new(1);
        let day = if forward {
            today.checked_add_days(d)
        } else {
            today.checked_sub_days(d)
        };
        day.map(DateRange::single)
            .ok_or_else(|| Error::External(format!("date out of range near {today}")))
    };

    let (range, criteria, cap) = match command {
        Command::Today => (DateRange::single(today), FilterCriteria::none(), Some(DAY_CAP)),
        Command::Tomorrow => (shifted(true)?, FilterCriteria::none(), Some(DAY_CAP)),
        Command::Yesterday => (shifted(false)?, FilterCriteria::none(), Some(DAY_CAP)),
        Command::Dangerous => (DateRange::single(today), FilterCriteria::hazardous(), None),
        Command::Large => (
            DateRange::single(today),
            FilterCriteria::at_least(LARGE_MIN_DIAMETER_M),
            None,
        ),
        Command::Small => (
            DateRange::single(today),
            FilterCriteria::at_most(SMALL_MAX_DIAMETER_M),
            None,
        ),
        Command::Week => (
            DateRange::spanning(today, WEEK_SPAN_DAYS)?,
            FilterCriteria::none(),
            Some(WEEK_CAP),
        ),
        other => {
            return Err(Error::External(format!("{other:?} is not a listing")));
        }
    };

    Ok(Listing {
        range,
        criteria,
        cap,
    })
}

fn chart_caption(s: &Strings, date: &str, bars: &[Bar]) -> String {
    let mut lines = vec![with_date(s.chart_title, date), s.chart_axis.to_string()];
    lines.extend(bars.iter().enumerate().map(|(i, b)| {
        format!(
            "{}. {}: {} {}",
            i + 1,
            b.label,
            format_thousands(b.value),
            s.km
        )
    }));
    lines.join("\n")
}
