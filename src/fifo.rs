//! Audio thread to editor sample queue, one per channel.

use rtrb::{Consumer, Producer, RingBuffer};

/// How many blocks of `block_size` samples fit in the queue.
pub(crate) const FIFO_BLOCKS: usize = 30;

/// Create a queue that holds [`FIFO_BLOCKS`] blocks and is read one block at a time.
pub(crate) fn sample_fifo(block_size: usize) -> (SampleFifoProducer, SampleFifoConsumer) {
    let block_size = block_size.max(1);
    let (producer, consumer) = RingBuffer::new(block_size * FIFO_BLOCKS);

    (
        SampleFifoProducer { producer },
        SampleFifoConsumer {
            consumer,
            block_size,
        },
    )
}

/// Audio thread end. Never blocks and never allocates.
pub(crate) struct SampleFifoProducer {
    producer: Producer<f32>,
}

impl SampleFifoProducer {
    /// Queue `samples`, or drop all of them if they do not fit. Returns `true` if queued.
    pub(crate) fn push(&mut self, samples: &[f32]) -> bool {
        let Ok(mut chunk) = self.producer.write_chunk(samples.len()) else {
            return false;
        };

        let (first, second) = chunk.as_mut_slices();
        let split = first.len();
        first.copy_from_slice(&samples[..split]);
        second.copy_from_slice(&samples[split..]);
        chunk.commit_all();

        true
    }
}

/// Editor end.
pub(crate) struct SampleFifoConsumer {
    consumer: Consumer<f32>,
    block_size: usize,
}

impl SampleFifoConsumer {
    pub(crate) fn block_size(&self) -> usize {
        self.block_size
    }

    pub(crate) fn num_complete_blocks_available(&self) -> usize {
        self.consumer.slots() / self.block_size
    }

    /// Copy the next complete block into `block`, which must be `block_size` long.
    /// Returns `false` and leaves `block` alone if there is no complete block.
    pub(crate) fn pop_block(&mut self, block: &mut [f32]) -> bool {
        nih_plug::nih_debug_assert_eq!(block.len(), self.block_size);

        let Ok(chunk) = self.consumer.read_chunk(self.block_size) else {
            return false;
        };

        let (first, second) = chunk.as_slices();
        block[..first.len()].copy_from_slice(first);
        block[first.len()..].copy_from_slice(second);
        chunk.commit_all();

        true
    }
}
