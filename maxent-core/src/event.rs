//! # Event - One Training Observation
//!
//! An event is the context of a decision point during training:
//! the outcome that was observed and the contextual predicates
//! that were active, optionally with a real-valued weight each.
//!
//! Events are produced by an external tokenizer and pulled, one at a
//! time, through an [`EventStream`].

use std::fmt;
use std::iter::Peekable;

use serde::{Deserialize, Serialize};

use crate::error::{MaxentError, MaxentResult};
use crate::traits::EventStream;

/// A raw training event
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEvent")]
pub struct Event {
    outcome: String,
    context: Vec<String>,
    values: Option<Vec<f32>>,
}

/// Wire shape of [`Event`], checked on the way in
#[derive(Deserialize)]
struct RawEvent {
    outcome: String,
    context: Vec<String>,
    #[serde(default)]
    values: Option<Vec<f32>>,
}

impl TryFrom<RawEvent> for Event {
    type Error = MaxentError;

    fn try_from(raw: RawEvent) -> MaxentResult<Self> {
        match raw.values {
            Some(values) => Self::with_values(raw.outcome, raw.context, values),
            None => Ok(Self::new(raw.outcome, raw.context)),
        }
    }
}

impl Event {
    /// Create an event whose predicates all carry the implicit weight 1.0
    pub fn new(outcome: impl Into<String>, context: Vec<String>) -> Self {
        Self {
            outcome: outcome.into(),
            context,
            values: None,
        }
    }

    /// Create a weighted event
    ///
    /// `values[i]` is the weight of `context[i]`.
    pub fn with_values(
        outcome: impl Into<String>,
        context: Vec<String>,
        values: Vec<f32>,
    ) -> MaxentResult<Self> {
        if values.len() != context.len() {
            return Err(MaxentError::length_mismatch(
                "event values",
                context.len(),
                values.len(),
            ));
        }
        Ok(Self {
            outcome: outcome.into(),
            context,
            values: Some(values),
        })
    }

    pub fn outcome(&self) -> &str {
        &self.outcome
    }

    pub fn context(&self) -> &[String] {
        &self.context
    }

    pub fn values(&self) -> Option<&[f32]> {
        self.values.as_deref()
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[", self.outcome)?;
        for (i, pred) in self.context.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            match &self.values {
                Some(values) => write!(f, "{}={}", pred, values[i])?,
                None => write!(f, "{}", pred)?,
            }
        }
        write!(f, "]")
    }
}

/// Event stream over any iterator of events
pub struct IterEventStream<I: Iterator<Item = Event>> {
    inner: Peekable<I>,
}

impl<I: Iterator<Item = Event>> IterEventStream<I> {
    pub fn new(events: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            inner: events.into_iter().peekable(),
        }
    }
}

impl<I: Iterator<Item = Event>> EventStream for IterEventStream<I> {
    fn has_next(&mut self) -> MaxentResult<bool> {
        Ok(self.inner.peek().is_some())
    }

    fn next_event(&mut self) -> MaxentResult<Event> {
        self.inner.next().ok_or(MaxentError::StreamExhausted)
    }
}

/// A batch of events produced from one source object
#[derive(Clone, Debug)]
pub struct Sequence<S> {
    pub events: Vec<Event>,
    pub source: S,
}

impl<S> Sequence<S> {
    pub fn new(events: Vec<Event>, source: S) -> Self {
        Self { events, source }
    }
}

/// Flattens a stream of sequences into a stream of events
///
/// Empty sequences are skipped.
pub struct SequenceEventStream<S, I: Iterator<Item = Sequence<S>>> {
    sequences: I,
    current: std::vec::IntoIter<Event>,
}

impl<S, I: Iterator<Item = Sequence<S>>> SequenceEventStream<S, I> {
    pub fn new(sequences: impl IntoIterator<IntoIter = I>) -> Self {
        Self {
            sequences: sequences.into_iter(),
            current: Vec::new().into_iter(),
        }
    }
}

impl<S, I: Iterator<Item = Sequence<S>>> EventStream for SequenceEventStream<S, I> {
    fn has_next(&mut self) -> MaxentResult<bool> {
        while self.current.as_slice().is_empty() {
            match self.sequences.next() {
                Some(seq) => self.current = seq.events.into_iter(),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    fn next_event(&mut self) -> MaxentResult<Event> {
        if !self.has_next()? {
            return Err(MaxentError::StreamExhausted);
        }
        self.current.next().ok_or(MaxentError::StreamExhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(preds: &[&str]) -> Vec<String> {
        preds.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_values_must_align() {
        let err = Event::with_values("A", ctx(&["p1", "p2"]), vec![1.0]).unwrap_err();
        assert!(matches!(
            err,
            MaxentError::LengthMismatch { expected: 2, actual: 1, .. }
        ));
    }

    #[test]
    fn test_deserialize_checks_values() {
        let err = serde_json::from_str::<Event>(
            r#"{"outcome":"A","context":["p1","p2"],"values":[0.5]}"#,
        );
        assert!(err.is_err());

        let ev: Event =
            serde_json::from_str(r#"{"outcome":"A","context":["p1","p2"],"values":[0.5,2.0]}"#)
                .unwrap();
        assert_eq!(ev.values(), Some(&[0.5f32, 2.0][..]));

        let plain: Event = serde_json::from_str(r#"{"outcome":"B","context":["p1"]}"#).unwrap();
        assert_eq!(plain, Event::new("B", ctx(&["p1"])));

        let round: Event = serde_json::from_str(&serde_json::to_string(&ev).unwrap()).unwrap();
        assert_eq!(round, ev);
    }

    #[test]
    fn test_display() {
        let plain = Event::new("A", ctx(&["p1", "p2"]));
        assert_eq!(plain.to_string(), "A[p1 p2]");

        let weighted = Event::with_values("B", ctx(&["p1"]), vec![0.5]).unwrap();
        assert_eq!(weighted.to_string(), "B[p1=0.5]");
    }

    #[test]
    fn test_iter_stream() {
        let mut stream = IterEventStream::new(vec![
            Event::new("A", ctx(&["p1"])),
            Event::new("B", ctx(&["p2"])),
        ]);

        assert!(stream.has_next().unwrap());
        assert_eq!(stream.next_event().unwrap().outcome(), "A");
        assert!(stream.has_next().unwrap());
        assert_eq!(stream.next_event().unwrap().outcome(), "B");
        assert!(!stream.has_next().unwrap());
        assert!(matches!(stream.next_event(), Err(MaxentError::StreamExhausted)));
    }

    #[test]
    fn test_sequence_stream_skips_empty() {
        let sequences = vec![
            Sequence::new(vec![Event::new("A", ctx(&["p1"]))], 0),
            Sequence::new(vec![], 1),
            Sequence::new(
                vec![Event::new("B", ctx(&["p2"])), Event::new("C", ctx(&["p3"]))],
                2,
            ),
        ];
        let mut stream = SequenceEventStream::new(sequences);

        let mut outcomes = Vec::new();
        while stream.has_next().unwrap() {
            outcomes.push(stream.next_event().unwrap().outcome().to_string());
        }
        assert_eq!(outcomes, vec!["A", "B", "C"]);
    }
}
