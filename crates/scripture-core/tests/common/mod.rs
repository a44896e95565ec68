//! Shared fixtures for scripture-core integration tests

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use scripture_core::{CorpusSource, SourceError};

/// Small corpus in the published plain-text layout, banner lines included
pub const FIXTURE: &str = "\
The Holy Bible, Berean Standard Bible, BSB
This text of the Berean Standard Bible is dedicated to the public domain.

Verse\tBerean Standard Bible
Genesis 1:1\tIn the beginning God created the heavens and the earth.
Genesis 1:2\tThe earth was formless and void.
Genesis 2:1\tThus the heavens and the earth were completed in all their vast array.
1 Samuel 17:1\tNow the Philistines gathered their forces for war at Socoh in Judah.
1 Samuel 27:2\tSo David set out with his six hundred men to Achish son of Maoch, the king of the Philistines of Gath.
1 Samuel 29:3\tThe commanders of the Philistines asked, \"What are these Hebrews doing here?\" Achish the king replied.
2 Samuel 5:17\tWhen the Philistines heard that David had been anointed king over Israel, they went up in search of him.
Psalm 23:1\tThe LORD is my shepherd; I shall not want.
Psalm 23:2\tHe makes me lie down in green pastures; He leads me beside quiet waters.
John 3:1\tNow there was a Pharisee named Nicodemus, a leader of the Jews.
John 3:16\tFor God so loved the world that He gave His one and only Son, that everyone who believes in Him shall not perish but have eternal life.
John 3:17\tFor God did not send His Son into the world to condemn the world, but to save the world through Him.
John 10:11\tI am the good shepherd. The good shepherd lays down His life for the sheep.
John 10:14\tI am the good shepherd. I know My sheep and My sheep know Me.
";

/// Source that counts fetches, waits before answering and fails the first
/// `failures` calls.
pub struct CountingSource {
    pub calls: Arc<AtomicUsize>,
    text: String,
    delay: Duration,
    failures: usize,
}

impl CountingSource {
    pub fn new(text: &str) -> Self {
        Self {
            calls: Arc::new(AtomicUsize::new(0)),
            text: text.to_string(),
            delay: Duration::ZERO,
            failures: 0,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing_first(mut self, failures: usize) -> Self {
        self.failures = failures;
        self
    }
}

#[async_trait]
impl CorpusSource for CountingSource {
    async fn fetch(&self) -> Result<String, SourceError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        if call < self.failures {
            return Err(SourceError::Status(503));
        }
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        "https://example.org/bsb.txt".to_string()
    }
}

/// `count` one-verse chapters of Proverbs that all mention "wisdom" twice.
/// Chapters not divisible by three also mention "understanding".
pub fn proverbs_corpus_text(count: u32) -> String {
    (1..=count)
        .map(|n| {
            let extra = if n % 3 != 0 { " Understanding raises her voice." } else { "" };
            format!("Proverbs {}:1 Wisdom calls aloud; wisdom lifts her voice.{}\n", n, extra)
        })
        .collect()
}
