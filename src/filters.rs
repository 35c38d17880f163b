use crate::models::Color;
use askama::Error;
use chrono::{NaiveDateTime, Utc};
use chrono_humanize::{Accuracy, HumanTime, Tense};

/// `#rrggbb` for `<input type="color">`, which ignores anything else.
pub fn hex(value: &str) -> Result<String, Error> {
    Ok(value
        .parse::<Color>()
        .map(Color::to_hex)
        .unwrap_or_else(|_| s!("#000000")))
}

pub fn age(at: &NaiveDateTime) -> Result<String, Error> {
    let ht = HumanTime::from(Utc::now().naive_utc() - *at);
    Ok(ht.to_text_en(Accuracy::Rough, Tense::Past))
}
