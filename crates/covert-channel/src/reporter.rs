//! Human-readable transmission report.

use crate::session::Transmission;

/// Bytes shown in the hex preview before truncating.
const PREVIEW_BYTES: usize = 16;

#[derive(Debug)]
pub struct Report {
    pub input_bytes: usize,
    pub decoded_bytes: usize,
    pub bits_sent: usize,
    pub creates: usize,
    pub handoffs: u64,
    /// Decoded output equals the input byte for byte.
    pub intact: bool,
    pub preview: String,
    pub elapsed: std::time::Duration,
}

impl Report {
    pub fn build(message: &[u8], tx: &Transmission) -> Self {
        let shown = &tx.decoded[..tx.decoded.len().min(PREVIEW_BYTES)];
        let mut preview = hex::encode(shown);
        if tx.decoded.len() > PREVIEW_BYTES {
            preview.push('…');
        }

        Report {
            input_bytes: message.len(),
            decoded_bytes: tx.decoded.len(),
            bits_sent: tx.sender.bits_sent,
            creates: tx.sender.creates,
            handoffs: tx.handoffs,
            intact: tx.decoded == message,
            preview,
            elapsed: tx.elapsed,
        }
    }

    /// Bits per second over the whole run, sentinel included.
    pub fn bandwidth(&self) -> f64 {
        let secs = self.elapsed.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bits_sent as f64 / secs
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        out.push('\n');
        out.push_str("╔══════════════════════════════════════════════════════════════╗\n");
        out.push_str("║                  COVERT CHANNEL TRANSMISSION                 ║\n");
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        out.push_str(&format!("║  Input bytes:        {:>39} ║\n", self.input_bytes));
        out.push_str(&format!("║  Decoded bytes:      {:>39} ║\n", self.decoded_bytes));
        out.push_str(&format!("║  Bits signalled:     {:>39} ║\n", self.bits_sent));
        out.push_str(&format!("║  Objects created:    {:>39} ║\n", self.creates));
        out.push_str(&format!("║  Token hand-offs:    {:>39} ║\n", self.handoffs));
        out.push_str(&format!(
            "║  Intact:             {:>39} ║\n",
            if self.intact { "yes" } else { "NO" }
        ));
        out.push_str(&format!("║  Elapsed:            {:>39} ║\n", format!("{:?}", self.elapsed)));
        out.push_str(&format!(
            "║  Bandwidth:          {:>39} ║\n",
            format!("{:.1} bit/s", self.bandwidth())
        ));
        out.push_str("╠══════════════════════════════════════════════════════════════╣\n");
        if self.preview.is_empty() {
            out.push_str("║  (empty message)                                             ║\n");
        } else {
            out.push_str(&format!("║  {}\n", self.preview));
        }
        out.push_str("╚══════════════════════════════════════════════════════════════╝\n");
        out
    }
}
