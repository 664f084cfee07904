//! Keyboard byte source for the event loop

use log::{debug, error};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Largest chunk forwarded per read. A paste may span several chunks.
pub const KEY_CHUNK_SIZE: usize = 64;

/// Spawns a task that forwards raw keyboard bytes in read-sized chunks.
///
/// The channel closes when the reader reaches end of input or fails, which the
/// event loop treats as the keyboard going away.
pub fn spawn_keyboard_reader<R>(mut reader: R) -> (mpsc::Receiver<Vec<u8>>, JoinHandle<()>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let (tx, rx) = mpsc::channel(32);

    let handle = tokio::spawn(async move {
        let mut buffer = [0u8; KEY_CHUNK_SIZE];

        loop {
            match reader.read(&mut buffer).await {
                Ok(0) => {
                    debug!("Keyboard input reached end of stream");
                    break;
                }
                Ok(len) => {
                    if tx.send(buffer[..len].to_vec()).await.is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("Error reading keyboard: {}", e);
                    break;
                }
            }
        }
    });

    (rx, handle)
}
