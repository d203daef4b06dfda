use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ids::SotwId;

/// Aggregated results for one finished week.
///
/// The server stores the place lists, song tallies and guessing data as
/// JSON-encoded strings; the accessor methods decode them on demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Results {
    pub id: String,
    pub sotw_id: SotwId,
    pub week_id: String,
    pub first_place: String,
    pub second_place: String,
    pub all_songs: String,
    pub guessing_data: String,
    #[serde(default)]
    pub theme: Option<String>,
    #[serde(default)]
    pub theme_description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SongTally {
    pub name: String,
    #[serde(default)]
    pub voters: Vec<String>,
    pub submitter: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guess {
    pub song: String,
    pub submitter_guess: String,
    pub correct: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessingRecord {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub guesses: Vec<Guess>,
    pub num_correct_guesses: u32,
}

impl Results {
    pub fn first_place_songs(&self) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&self.first_place)?)
    }

    pub fn second_place_songs(&self) -> Result<Vec<String>> {
        Ok(serde_json::from_str(&self.second_place)?)
    }

    /// Song tallies keyed by song id.
    pub fn songs(&self) -> Result<BTreeMap<String, SongTally>> {
        Ok(serde_json::from_str(&self.all_songs)?)
    }

    pub fn guessing(&self) -> Result<Vec<GuessingRecord>> {
        Ok(serde_json::from_str(&self.guessing_data)?)
    }
}

/// Returned instead of results while the week's release time has not passed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsPending {
    pub message: String,
    pub release_time: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResultsPayload {
    Pending(ResultsPending),
    Ready(Results),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "id": "9",
            "sotw_id": "42",
            "week_id": "42+1",
            "first_place": "[\"Song A\"]",
            "second_place": "[\"Song B\", \"Song C\"]",
            "all_songs": "{\"1\": {\"name\": \"Song A\", \"voters\": [\"Ada\"], \"submitter\": \"Grace\"}}",
            "guessing_data": "[{\"id\": 3, \"name\": \"Ada\", \"guesses\": [], \"num_correct_guesses\": 2}]",
            "theme": null
        })
    }

    #[test]
    fn test_ready_results_decode_embedded_json() {
        let payload: ResultsPayload = serde_json::from_value(sample()).unwrap();
        let ResultsPayload::Ready(results) = payload else {
            panic!("expected ready results");
        };

        assert_eq!(results.sotw_id, SotwId(42));
        assert_eq!(results.first_place_songs().unwrap(), vec!["Song A".to_string()]);
        assert_eq!(results.second_place_songs().unwrap().len(), 2);
        assert_eq!(results.songs().unwrap()["1"].voters, vec!["Ada".to_string()]);
        assert_eq!(results.guessing().unwrap()[0].num_correct_guesses, 2);
    }

    #[test]
    fn test_pending_results() {
        let payload: ResultsPayload = serde_json::from_value(json!({
            "message": "Results are released on Friday",
            "release_time": 1_700_000_000_000_i64
        }))
        .unwrap();

        assert!(matches!(payload, ResultsPayload::Pending(_)));
    }
}
