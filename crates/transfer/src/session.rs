use msalign_protocol::CompletedPart;

use crate::TransferError;

/// A presigned PUT target for one part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresignedPart {
    /// 0-based part index as issued by the endpoint.
    pub index: u32,
    pub url: String,
}

/// State of one multipart upload, from begin to complete.
///
/// Parts must be recorded in the order they were issued; the session only
/// yields its completion list once every part has a record.
#[derive(Debug)]
pub struct UploadSession {
    upload_id: String,
    parts: Vec<PresignedPart>,
    completed: Vec<CompletedPart>,
    bytes_sent: u64,
}

impl UploadSession {
    /// Creates a session from the begin-upload response.
    ///
    /// `parts` must already be sorted by index.
    pub fn new(upload_id: String, parts: Vec<(u32, String)>) -> Self {
        let parts: Vec<PresignedPart> = parts
            .into_iter()
            .map(|(index, url)| PresignedPart { index, url })
            .collect();
        Self {
            upload_id,
            completed: Vec::with_capacity(parts.len()),
            parts,
            bytes_sent: 0,
        }
    }

    /// The next part still waiting for a record.
    pub fn next_part(&self) -> Option<&PresignedPart> {
        self.parts.get(self.completed.len())
    }

    /// Records a successfully uploaded part.
    pub fn record_part(
        &mut self,
        index: u32,
        etag: String,
        bytes: u64,
    ) -> Result<(), TransferError> {
        let expected = match self.next_part() {
            Some(part) => part.index,
            None => {
                return Err(TransferError::PartOutOfOrder {
                    expected: self.parts.last().map_or(0, |p| p.index.saturating_add(1)),
                    got: index,
                });
            }
        };
        if index != expected {
            return Err(TransferError::PartOutOfOrder {
                expected,
                got: index,
            });
        }
        let part_number = index
            .checked_add(1)
            .ok_or(TransferError::PartNumberOverflow(index))?;

        self.completed.push(CompletedPart { etag, part_number });
        self.bytes_sent += bytes;
        Ok(())
    }

    /// Parts recorded so far.
    pub fn completed(&self) -> &[CompletedPart] {
        &self.completed
    }

    /// Returns `true` once every part has been recorded.
    pub fn is_complete(&self) -> bool {
        self.completed.len() == self.parts.len()
    }

    /// Total bytes of all recorded parts.
    pub fn bytes_sent(&self) -> u64 {
        self.bytes_sent
    }

    /// Consumes the session, returning the upload id and ordered part list.
    pub fn into_completion(self) -> Result<(String, Vec<CompletedPart>), TransferError> {
        if !self.is_complete() {
            return Err(TransferError::IncompleteUpload {
                recorded: self.completed.len(),
                planned: self.parts.len(),
            });
        }
        Ok((self.upload_id, self.completed))
    }
}
