use async_trait::async_trait;

use crate::{
    chart::Bar,
    domain::{DateRange, FeedDays, PictureOfTheDay},
    Result,
};

/// Hexagonal port for the astronomy data API.
///
/// Implementations perform exactly one request per call and never cache:
/// every user interaction sees fresh data.
#[async_trait]
pub trait AstronomyApi: Send + Sync {
    /// Near-Earth objects for each day of `range`, in response order.
    async fn neo_feed(&self, range: DateRange) -> Result<FeedDays>;

    async fn picture_of_the_day(&self) -> Result<PictureOfTheDay>;
}

/// Turns labelled values into an encoded image.
pub trait ChartRenderer: Send + Sync {
    /// Bars in input order, top to bottom, with `title` above the plot and
    /// `x_label` under the value axis. An empty `bars` is a render error.
    fn render_bars(&self, title: &str, x_label: &str, bars: &[Bar]) -> Result<Vec<u8>>;
}
