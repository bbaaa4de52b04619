use anyhow::Result;
use log::warn;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::sync::mpsc::{self, Sender};
use std::thread;
use std::time::Duration;

/// 警告1件分の通知
#[derive(Debug, Clone, Copy)]
pub struct AlertEvent {
    /// 悪い姿勢が続いた時間
    pub elapsed: Duration,
}

/// 警告ポップアップを別スレッドで表示する送り口
///
/// コアループからは送信のみで、表示側からコア状態への書き戻しは無い。
/// ポップアップの閉鎖はゲートの再武装に影響しない。
pub struct AlertSurface {
    tx: Sender<AlertEvent>,
    _dispatcher: thread::JoinHandle<()>,
}

impl AlertSurface {
    pub fn start() -> Self {
        let (tx, rx) = mpsc::channel::<AlertEvent>();

        // 1件ごとに独立したポップアップ。前の通知が開いたままでも次を出す。
        let dispatcher = thread::spawn(move || {
            for event in rx {
                thread::spawn(move || {
                    if let Err(e) = show_popup(event) {
                        warn!("Alert popup failed: {}", e);
                    }
                });
            }
        });

        Self {
            tx,
            _dispatcher: dispatcher,
        }
    }

    /// 警告を1件通知する。表示の失敗はキャプチャループに影響しない。
    pub fn alert(&self, event: AlertEvent) {
        if self.tx.send(event).is_err() {
            warn!("Alert surface is gone; dropping alert");
        }
    }
}

const POPUP_WIDTH: usize = 480;
const POPUP_HEIGHT: usize = 160;

/// キー入力かウィンドウクローズで閉じるポップアップ
fn show_popup(event: AlertEvent) -> Result<()> {
    println!(
        "Alert: correct your posture! (bad for {}s)",
        event.elapsed.as_secs()
    );

    let mut window = Window::new(
        "Posture Alert - Correct your posture!",
        POPUP_WIDTH,
        POPUP_HEIGHT,
        WindowOptions::default(),
    )?;

    let buffer = banner_buffer(POPUP_WIDTH, POPUP_HEIGHT);

    while window.is_open() {
        let dismissed = window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .any(|k| matches!(k, Key::Enter | Key::Escape | Key::Space));
        if dismissed {
            break;
        }
        window.update_with_buffer(&buffer, POPUP_WIDTH, POPUP_HEIGHT)?;
    }

    Ok(())
}

/// 赤地に白枠の警告バナー
fn banner_buffer(width: usize, height: usize) -> Vec<u32> {
    const RED: u32 = 0xCC1111;
    const WHITE: u32 = 0xFFFFFF;
    const BORDER: usize = 6;

    let mut buffer = vec![RED; width * height];
    for y in 0..height {
        for x in 0..width {
            let on_border =
                x < BORDER || x >= width - BORDER || y < BORDER || y >= height - BORDER;
            if on_border {
                buffer[y * width + x] = WHITE;
            }
        }
    }
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_buffer_dimensions() {
        let buffer = banner_buffer(100, 40);
        assert_eq!(buffer.len(), 100 * 40);
    }

    #[test]
    fn test_banner_buffer_border_is_white() {
        let buffer = banner_buffer(100, 40);
        assert_eq!(buffer[0], 0xFFFFFF);
        assert_eq!(buffer[100 * 40 - 1], 0xFFFFFF);
        // 中心は赤
        assert_eq!(buffer[20 * 100 + 50], 0xCC1111);
    }
}
