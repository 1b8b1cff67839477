//! Reading time estimation for article bodies

use crate::model::ContentBlock;

/// Default reading speed in words per minute
pub const DEFAULT_WORDS_PER_MINUTE: usize = 200;

/// Reading time estimator using a fixed words-per-minute rate
#[derive(Debug, Clone, Copy)]
pub struct ReadingTimeEstimator {
    words_per_minute: usize,
}

impl ReadingTimeEstimator {
    /// Create an estimator; a zero rate is treated as one word per minute
    pub fn new(words_per_minute: usize) -> Self {
        Self {
            words_per_minute: words_per_minute.max(1),
        }
    }

    /// Estimate reading time in whole minutes
    ///
    /// Text-bearing blocks are joined with single spaces and split on
    /// whitespace runs. The word count is divided by the rate, rounded up,
    /// and floored at one minute.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use lonko_content::model::{ContentBlock, Span};
    /// use lonko_content::reading_time::ReadingTimeEstimator;
    ///
    /// let estimator = ReadingTimeEstimator::default();
    /// assert_eq!(estimator.estimate(&[]), 1);
    ///
    /// let body = vec![ContentBlock::Paragraph { spans: vec![Span::plain("mot ".repeat(201))] }];
    /// assert_eq!(estimator.estimate(&body), 2);
    /// ```
    pub fn estimate(&self, body: &[ContentBlock]) -> usize {
        self.minutes_for(count_words(body))
    }

    /// Minutes for a known word count
    pub fn minutes_for(&self, words: usize) -> usize {
        words.div_ceil(self.words_per_minute).max(1)
    }
}

impl Default for ReadingTimeEstimator {
    fn default() -> Self {
        Self::new(DEFAULT_WORDS_PER_MINUTE)
    }
}

/// Count words across the text-bearing blocks of a body
pub fn count_words(body: &[ContentBlock]) -> usize {
    body.iter()
        .filter(|block| block.is_text_bearing())
        .map(ContentBlock::text)
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImageBlock, Span};
    use proptest::prelude::*;

    fn paragraph(text: &str) -> ContentBlock {
        ContentBlock::Paragraph {
            spans: vec![Span::plain(text)],
        }
    }

    fn words(n: usize) -> String {
        vec!["ߞߎߡߊ"; n].join(" ")
    }

    #[test]
    fn test_exact_boundaries() {
        let estimator = ReadingTimeEstimator::default();
        assert_eq!(estimator.estimate(&[paragraph(&words(400))]), 2);
        assert_eq!(estimator.estimate(&[paragraph(&words(401))]), 3);
        assert_eq!(estimator.estimate(&[paragraph(&words(200))]), 1);
    }

    #[test]
    fn test_zero_words_floors_at_one() {
        let estimator = ReadingTimeEstimator::default();
        assert_eq!(estimator.estimate(&[]), 1);
        assert_eq!(estimator.estimate(&[paragraph("   \n\t ")]), 1);
    }

    #[test]
    fn test_blocks_joined_with_space() {
        // "fin" and "début" must not merge across blocks
        let body = vec![paragraph("la fin"), paragraph("début du texte")];
        assert_eq!(count_words(&body), 5);
    }

    #[test]
    fn test_images_and_lists() {
        let body = vec![
            ContentBlock::Image(ImageBlock {
                asset: None,
                direct_url: None,
                caption: Some("trois mots ici".into()),
                alt_text: None,
                credit: None,
            }),
            ContentBlock::BulletList {
                items: vec![vec![Span::plain("un")], vec![Span::plain("deux")]],
            },
        ];
        assert_eq!(count_words(&body), 2);
    }

    #[test]
    fn test_custom_rate() {
        let estimator = ReadingTimeEstimator::new(100);
        assert_eq!(estimator.minutes_for(250), 3);
        assert_eq!(ReadingTimeEstimator::new(0).minutes_for(5), 5);
    }

    proptest! {
        #[test]
        fn prop_minutes_match_formula(n in 0usize..5000) {
            let estimator = ReadingTimeEstimator::default();
            let minutes = estimator.estimate(&[paragraph(&words(n))]);
            prop_assert!(minutes >= 1);
            prop_assert_eq!(minutes, n.div_ceil(200).max(1));
        }
    }
}
