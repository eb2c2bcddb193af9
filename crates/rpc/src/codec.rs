//! # 帧编解码
//!
//! 帧格式: 4 字节大端长度 + JSON 正文。

use bytes::{BufMut, Bytes, BytesMut};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

// -----------------------------------------------------------------------------
// ----- Constants -------------------------------------------------------------

/// 单帧正文上限
pub const MAX_FRAME_LEN: usize = 16 * 1024 * 1024;

const HEADER_LEN: usize = 4;

// -----------------------------------------------------------------------------
// ----- CodecError ------------------------------------------------------------

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Malformed frame body: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Frame too large: {0} bytes")]
    FrameTooLarge(usize),
    #[error("Connection closed by peer")]
    ConnectionClosed,
}

// -----------------------------------------------------------------------------
// ----- Encode ----------------------------------------------------------------

/// 把消息编码为一个完整的帧。
pub fn encode_frame<T: Serialize>(msg: &T) -> Result<Bytes, CodecError> {
    let body = serde_json::to_vec(msg)?;
    if body.len() > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(body.len()));
    }
    let len = u32::try_from(body.len()).map_err(|_| CodecError::FrameTooLarge(body.len()))?;

    let mut buf = BytesMut::with_capacity(HEADER_LEN + body.len());
    buf.put_u32(len);
    buf.put_slice(&body);
    Ok(buf.freeze())
}

pub async fn write_frame<W, T>(writer: &mut W, msg: &T) -> Result<(), CodecError>
where
    W: AsyncWrite + Unpin,
    T: Serialize,
{
    let frame = encode_frame(msg)?;
    writer.write_all(&frame).await?;
    writer.flush().await?;
    Ok(())
}

// -----------------------------------------------------------------------------
// ----- Decode ----------------------------------------------------------------

/// 读取一帧。对端在帧边界处关闭连接时返回 `Ok(None)`。
pub async fn read_frame<R, T>(reader: &mut R) -> Result<Option<T>, CodecError>
where
    R: AsyncRead + Unpin,
    T: DeserializeOwned,
{
    let len = match reader.read_u32().await {
        Ok(n) => n,
        Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let len = usize::try_from(len).map_err(|_| CodecError::FrameTooLarge(MAX_FRAME_LEN))?;
    if len > MAX_FRAME_LEN {
        return Err(CodecError::FrameTooLarge(len));
    }

    let mut body = vec![0u8; len];
    reader.read_exact(&mut body).await?;
    Ok(Some(serde_json::from_slice(&body)?))
}
